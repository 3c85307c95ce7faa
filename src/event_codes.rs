// The event-type sentinels a WH_KEYBOARD_LL hook procedure receives in its
// wparam argument (see [winuser.h]). The values must match the OS ABI.
//
// [winuser.h]: https://learn.microsoft.com/en-us/windows/win32/winmsg/lowlevelkeyboardproc

pub const WM_KEYDOWN: usize = 0x0100;
pub const WM_KEYUP: usize = 0x0101;
pub const WM_SYSKEYDOWN: usize = 0x0104;
pub const WM_SYSKEYUP: usize = 0x0105;
