use std::collections::HashSet;

/// A Windows virtual-key code.
///
/// Virtual-key codes identify logical keys independently of the physical
/// layout. The representable space is `0x01..=0xFE` (see [winuser.h]).
///
/// [winuser.h]: https://learn.microsoft.com/en-us/windows/win32/inputdev/virtual-key-codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(u8);

impl KeyCode {
    pub const LEFT_SHIFT: KeyCode = KeyCode(0xA0);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0xA1);

    const MIN: u8 = 0x01;
    const MAX: u8 = 0xFE;

    /// Create a `KeyCode` from a known-valid virtual-key code.
    pub const fn new(vk: u8) -> Self {
        KeyCode(vk)
    }

    /// Decode the virtual-key field of a raw hook record.
    ///
    /// Values outside the virtual-key space yield `None`; callers treat such
    /// events as not of interest rather than as errors.
    pub fn from_raw(vk: i32) -> Option<Self> {
        match u8::try_from(vk) {
            Ok(vk) if (Self::MIN..=Self::MAX).contains(&vk) => Some(KeyCode(vk)),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this is the left or right shift key.
    pub const fn is_shift(self) -> bool {
        self.0 == Self::LEFT_SHIFT.0 || self.0 == Self::RIGHT_SHIFT.0
    }

    /// Whether this key maps to an alphabetic character (VK_A..=VK_Z).
    pub const fn is_alphabetic(self) -> bool {
        self.0 >= 0x41 && self.0 <= 0x5A
    }
}

/// The set of virtual-key codes the hook watches.
///
/// Membership only; independent of the hook lifecycle, so it can be populated
/// before or after the hook is installed. Events for keys outside the set are
/// passed through unmodified and never reach subscribers.
#[derive(Debug, Clone, Default)]
pub struct KeyCodeSet(HashSet<KeyCode>);

impl KeyCodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key to the set. Adding a key twice is a no-op.
    pub fn register(&mut self, key: KeyCode) {
        self.0.insert(key);
    }

    /// Remove a key from the set. Removing an absent key is a no-op.
    pub fn unregister(&mut self, key: KeyCode) {
        self.0.remove(&key);
    }

    /// Replace the contents with every representable virtual-key code.
    pub fn register_all(&mut self) {
        self.0.clear();
        self.0.extend((KeyCode::MIN..=KeyCode::MAX).map(KeyCode));
    }

    /// Empty the set.
    pub fn unregister_all(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.0.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
