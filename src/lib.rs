//! This crate provides the scaffolding for intercepting keyboard input
//! system-wide on Windows, before normal input delivery.
//!
//! A [`GlobalKeyboardHook`] attaches to the OS's low-level keyboard hook
//! chain, filters every event against a caller-maintained set of watched
//! [`KeyCode`]s, tracks shift/alphabetic context, and republishes matching
//! events on key-down and key-up subscriber streams. A subscriber that marks
//! a [`KeyNotification`] handled suppresses the native event.
//!
//! The hook delivers callbacks synchronously on the thread that called
//! [`start`](KeyboardHook::start), which must keep pumping messages. The
//! platform-specific install/uninstall surface sits behind the [`HookDriver`]
//! trait, so the filtering, state-tracking and suppression logic also runs
//! against a fake driver in tests, on any OS.
//!
//! # Example
//!
//! Print every watched keystroke, swallowing none. Run on a thread that can
//! afford to block in the message loop.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), keyhook::HookError> {
//! use keyhook::{run_message_loop, GlobalKeyboardHook, KeyCode};
//!
//! let mut hook = GlobalKeyboardHook::new();
//! hook.register_all_keys();
//! hook.on_key_down(|note| {
//!     println!("down: {:?} (shift={})", note.key, note.shift_held);
//! });
//! hook.start()?;
//! run_message_loop();
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

mod channel;
mod error;
pub mod event_codes;
mod event;
mod hook;
mod key_code;
mod state;

#[cfg(windows)]
mod windows;

pub use channel::{NotificationStream, SubscriptionId};
pub use error::{HookError, HookResult};
pub use event::{KeyEventCause, KeyNotification, RawKeyRecord};
pub use hook::{HookAction, HookCore, HookDriver, KeyboardHook};
pub use key_code::{KeyCode, KeyCodeSet};
pub use state::ModifierState;

#[cfg(windows)]
pub use windows::{run_message_loop, GlobalKeyboardHook, WindowsHookDriver};
