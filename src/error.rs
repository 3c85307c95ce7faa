use thiserror::Error;

pub type HookResult<T> = Result<T, HookError>;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("failed to install keyboard hook (os error {0})")]
    Install(u32),
    #[error("a keyboard hook is already installed")]
    AlreadyInstalled,
    #[error("failed to remove keyboard hook (os error {0})")]
    Uninstall(u32),
    #[error("subscriber panicked during dispatch: {0}")]
    Subscriber(String),
}
