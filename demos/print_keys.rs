#[cfg(windows)]
fn main() -> Result<(), keyhook::HookError> {
    use keyhook::{run_message_loop, GlobalKeyboardHook};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut hook = GlobalKeyboardHook::new();
    hook.register_all_keys();
    hook.on_key_down(|note| {
        println!(
            "down: vk=0x{:02X} shift={} alphabetic_seen={}",
            note.key.value(),
            note.shift_held,
            note.alphabetic_seen
        );
    });
    hook.on_key_up(|note| println!("up:   vk=0x{:02X}", note.key.value()));

    hook.start()?;
    run_message_loop();

    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("print_keys only runs on Windows");
}
