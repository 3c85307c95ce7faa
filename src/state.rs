use crate::event::KeyEventCause;
use crate::key_code::KeyCode;

/// Modifier context derived from the observed event stream.
///
/// Owned by the dispatch core and mutated only on the hook thread.
/// `shift_held` follows the most recent shift press/release; `alphabetic_seen`
/// latches once an alphabetic key is observed and is never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// A left or right shift key is currently held.
    pub shift_held: bool,
    /// An alphabetic key has been observed at least once.
    pub alphabetic_seen: bool,
}

impl ModifierState {
    pub(crate) fn apply(&mut self, cause: KeyEventCause, key: KeyCode) {
        if key.is_shift() {
            self.shift_held = cause == KeyEventCause::Press;
        }
        if key.is_alphabetic() {
            self.alphabetic_seen = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use KeyEventCause::{Press, Release};

    #[test]
    fn shift_follows_most_recent_shift_event() {
        let mut state = ModifierState::default();
        let events = [
            (Press, KeyCode::LEFT_SHIFT, true),
            (Press, KeyCode::RIGHT_SHIFT, true),
            (Release, KeyCode::LEFT_SHIFT, false),
            (Press, KeyCode::LEFT_SHIFT, true),
            (Release, KeyCode::RIGHT_SHIFT, false),
            (Release, KeyCode::LEFT_SHIFT, false),
        ];

        for (cause, key, expected) in events {
            state.apply(cause, key);
            assert_eq!(state.shift_held, expected, "after {cause:?} {key:?}");
        }
    }

    #[test]
    fn non_shift_keys_leave_shift_untouched() {
        let mut state = ModifierState::default();
        state.apply(Press, KeyCode::LEFT_SHIFT);
        state.apply(Press, KeyCode::new(0x41));
        state.apply(Release, KeyCode::new(0x41));
        assert!(state.shift_held);
    }

    #[test]
    fn alphabetic_latches_on_press_and_release() {
        let mut state = ModifierState::default();
        state.apply(Release, KeyCode::new(0x5A));
        assert!(state.alphabetic_seen);

        let mut state = ModifierState::default();
        state.apply(Press, KeyCode::new(0x41));
        assert!(state.alphabetic_seen);
    }

    #[test]
    fn alphabetic_seen_is_sticky() {
        // The flag never resets for the lifetime of the state.
        let mut state = ModifierState::default();
        state.apply(Press, KeyCode::new(0x41));
        state.apply(Release, KeyCode::new(0x41));
        state.apply(Press, KeyCode::new(0x0D)); // VK_RETURN
        state.apply(Press, KeyCode::LEFT_SHIFT);
        state.apply(Release, KeyCode::LEFT_SHIFT);
        assert!(state.alphabetic_seen);
    }
}
