//! Lifecycle and dispatch tests for the public surface, driven by a fake
//! platform driver instead of a live OS hook.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use keyhook::event_codes::{WM_KEYDOWN, WM_KEYUP};
use keyhook::{
    HookAction, HookCore, HookDriver, HookError, HookResult, KeyCode, KeyboardHook,
    NotificationStream, RawKeyRecord,
};

const VK_A: u8 = 0x41;

#[derive(Clone, Default)]
struct DriverProbe {
    installs: Rc<Cell<usize>>,
    uninstalls: Rc<Cell<usize>>,
    fail_install: Rc<Cell<Option<u32>>>,
    fail_uninstall: Rc<Cell<Option<u32>>>,
}

struct FakeDriver(DriverProbe);

impl HookDriver for FakeDriver {
    fn install(&mut self, _core: &RefCell<HookCore>) -> HookResult<()> {
        if let Some(code) = self.0.fail_install.get() {
            return Err(HookError::Install(code));
        }
        self.0.installs.set(self.0.installs.get() + 1);
        Ok(())
    }

    fn uninstall(&mut self) -> HookResult<()> {
        if let Some(code) = self.0.fail_uninstall.get() {
            return Err(HookError::Uninstall(code));
        }
        self.0.uninstalls.set(self.0.uninstalls.get() + 1);
        Ok(())
    }
}

fn hook_with_probe() -> (KeyboardHook<FakeDriver>, DriverProbe) {
    let probe = DriverProbe::default();
    let hook = KeyboardHook::with_driver(FakeDriver(probe.clone()));
    (hook, probe)
}

fn record(vk: u8) -> RawKeyRecord {
    RawKeyRecord {
        vk_code: vk as i32,
        ..RawKeyRecord::default()
    }
}

#[test]
fn start_twice_without_stop_is_rejected() {
    let (mut hook, probe) = hook_with_probe();

    hook.start().unwrap();
    assert!(hook.is_installed());

    let err = hook.start().unwrap_err();
    assert!(matches!(err, HookError::AlreadyInstalled));
    assert_eq!(probe.installs.get(), 1);
    assert!(hook.is_installed());
}

#[test]
fn stop_without_start_is_a_successful_noop() {
    let (mut hook, probe) = hook_with_probe();

    hook.stop().unwrap();
    assert_eq!(probe.uninstalls.get(), 0);

    hook.start().unwrap();
    hook.stop().unwrap();
    hook.stop().unwrap();
    assert_eq!(probe.uninstalls.get(), 1);
}

#[test]
fn failed_install_surfaces_the_os_code_and_allows_retry() {
    let (mut hook, probe) = hook_with_probe();
    probe.fail_install.set(Some(1404));

    let err = hook.start().unwrap_err();
    assert!(matches!(err, HookError::Install(1404)));
    assert!(!hook.is_installed());

    probe.fail_install.set(None);
    hook.start().unwrap();
    assert!(hook.is_installed());
}

#[test]
fn failed_uninstall_surfaces_the_os_code() {
    let (mut hook, probe) = hook_with_probe();
    hook.start().unwrap();

    probe.fail_uninstall.set(Some(1460));
    let err = hook.stop().unwrap_err();
    assert!(matches!(err, HookError::Uninstall(1460)));
    assert!(hook.is_installed());

    probe.fail_uninstall.set(None);
    hook.stop().unwrap();
    assert!(!hook.is_installed());
}

#[test]
fn dropping_the_hook_releases_it() {
    let (mut hook, probe) = hook_with_probe();
    hook.start().unwrap();
    drop(hook);
    assert_eq!(probe.uninstalls.get(), 1);
}

#[test]
fn dropping_a_stopped_hook_does_not_release_twice() {
    let (mut hook, probe) = hook_with_probe();
    hook.start().unwrap();
    hook.stop().unwrap();
    drop(hook);
    assert_eq!(probe.uninstalls.get(), 1);
}

#[test]
fn subscribers_receive_and_can_suppress_watched_events() {
    let (mut hook, _probe) = hook_with_probe();
    hook.register_key(KeyCode::new(VK_A));
    hook.start().unwrap();

    let downs = Rc::new(Cell::new(0));
    let seen = Rc::clone(&downs);
    hook.on_key_down(move |note| {
        seen.set(seen.get() + 1);
        note.handled = true;
    });

    assert_eq!(hook.dispatch(0, WM_KEYDOWN, &record(VK_A)), HookAction::Suppress);
    assert_eq!(hook.dispatch(0, WM_KEYUP, &record(VK_A)), HookAction::Forward);
    assert_eq!(downs.get(), 1);
}

#[test]
fn unsubscribed_callback_no_longer_fires() {
    let (mut hook, _probe) = hook_with_probe();
    hook.register_key(KeyCode::new(VK_A));

    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    let id = hook.on_key_up(move |_| seen.set(seen.get() + 1));

    hook.dispatch(0, WM_KEYUP, &record(VK_A));
    assert!(hook.unsubscribe(NotificationStream::KeyUp, id));
    hook.dispatch(0, WM_KEYUP, &record(VK_A));

    assert_eq!(hits.get(), 1);
}

#[test]
fn key_set_can_change_while_the_hook_is_active() {
    let (mut hook, _probe) = hook_with_probe();
    hook.start().unwrap();

    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    hook.on_key_down(move |_| seen.set(seen.get() + 1));

    hook.dispatch(0, WM_KEYDOWN, &record(VK_A));
    assert_eq!(hits.get(), 0);

    hook.register_key(KeyCode::new(VK_A));
    hook.dispatch(0, WM_KEYDOWN, &record(VK_A));
    assert_eq!(hits.get(), 1);

    hook.unregister_all_keys();
    hook.dispatch(0, WM_KEYDOWN, &record(VK_A));
    assert_eq!(hits.get(), 1);
}
