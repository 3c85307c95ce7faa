use crate::event_codes::{WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP};
use crate::key_code::KeyCode;
use crate::state::ModifierState;

/// The raw record the OS hands to a low-level keyboard hook procedure for one
/// event: virtual-key code, scan code, flag bits, timestamp and an extra-info
/// word, all signed 32-bit.
///
/// A record only lives for the duration of one callback invocation; it is
/// borrowed by the dispatch path and never stored.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawKeyRecord {
    pub vk_code: i32,
    pub scan_code: i32,
    pub flags: i32,
    pub time: i32,
    pub extra_info: i32,
}

/// The action that triggered a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventCause {
    /// The key was pressed.
    Press,
    /// The key was released.
    Release,
}

impl KeyEventCause {
    /// Decode the wparam sentinel of a hook callback.
    ///
    /// System key messages (Alt held) map onto the same press/release causes.
    /// Unknown sentinels yield `None` and the event is passed through.
    pub fn from_wparam(wparam: usize) -> Option<Self> {
        match wparam {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(Self::Press),
            WM_KEYUP | WM_SYSKEYUP => Some(Self::Release),
            _ => None,
        }
    }
}

/// The payload delivered to subscribers for one watched key event.
///
/// A notification is created fresh per dispatched event and dropped as soon
/// as the last subscriber returns. Setting [`handled`](Self::handled) to
/// `true` suppresses the native event instead of forwarding it down the hook
/// chain.
#[derive(Debug)]
pub struct KeyNotification {
    /// The key that triggered the event.
    pub key: KeyCode,
    /// Whether a shift key was held when the event fired.
    pub shift_held: bool,
    /// Whether an alphabetic key has been observed since the hook was created.
    pub alphabetic_seen: bool,
    /// Suppress flag, `false` by default.
    pub handled: bool,
}

impl KeyNotification {
    pub(crate) fn new(key: KeyCode, state: ModifierState) -> Self {
        Self {
            key,
            shift_held: state.shift_held,
            alphabetic_seen: state.alphabetic_seen,
            handled: false,
        }
    }
}
