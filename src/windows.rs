//! The real hook driver: a WH_KEYBOARD_LL hook over the Win32 API.
//!
//! The OS delivers low-level keyboard callbacks on the installing thread,
//! which must keep pumping messages ([`run_message_loop`]) for the hook to
//! stay alive. Windows silently detaches a hook procedure that takes too
//! long to return, so subscribers must be quick.

#![allow(non_snake_case, dead_code)]

use std::cell::RefCell;
use std::ffi::c_void;
use std::ptr;

use tracing::debug;

use crate::error::{HookError, HookResult};
use crate::event::RawKeyRecord;
use crate::hook::{HookAction, HookCore, HookDriver, KeyboardHook};

// --- Win32 types and constants ---

type HHOOK = *mut c_void;
type HINSTANCE = *mut c_void;
type HWND = *mut c_void;
type WPARAM = usize;
type LPARAM = isize;
type LRESULT = isize;
type BOOL = i32;
type DWORD = u32;

const WH_KEYBOARD_LL: i32 = 13;

#[repr(C)]
struct POINT {
    x: i32,
    y: i32,
}

#[repr(C)]
struct MSG {
    hwnd: HWND,
    message: u32,
    wParam: WPARAM,
    lParam: LPARAM,
    time: u32,
    pt: POINT,
}

type HookProc = extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT;

#[link(name = "user32")]
extern "system" {
    fn SetWindowsHookExW(idHook: i32, lpfn: HookProc, hMod: HINSTANCE, dwThreadId: DWORD) -> HHOOK;
    fn UnhookWindowsHookEx(hhk: HHOOK) -> BOOL;
    fn CallNextHookEx(hhk: HHOOK, nCode: i32, wParam: WPARAM, lParam: LPARAM) -> LRESULT;
    fn GetMessageW(msg: *mut MSG, hWnd: HWND, min: u32, max: u32) -> BOOL;
    fn TranslateMessage(msg: *const MSG) -> BOOL;
    fn DispatchMessageW(msg: *const MSG) -> LRESULT;
}

#[link(name = "kernel32")]
extern "system" {
    fn GetModuleHandleW(lpModuleName: *const u16) -> HINSTANCE;
    fn GetLastError() -> DWORD;
}

// --- driver ---

struct ActiveHook {
    handle: HHOOK,
    core: *const RefCell<HookCore>,
}

thread_local! {
    // The hook procedure has no user-data argument, so the active core is
    // reached through this slot. Low-level hooks deliver on the installing
    // thread only, making a thread-local sufficient.
    static ACTIVE: RefCell<Option<ActiveHook>> = RefCell::new(None);
}

/// [`HookDriver`] backed by `SetWindowsHookExW(WH_KEYBOARD_LL, ..)`.
///
/// One hook per thread: installing while another one is active on the same
/// thread is rejected with [`HookError::AlreadyInstalled`] rather than
/// replacing the earlier registration. `uninstall` must run on the thread
/// that installed.
pub struct WindowsHookDriver;

impl WindowsHookDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsHookDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HookDriver for WindowsHookDriver {
    fn install(&mut self, core: &RefCell<HookCore>) -> HookResult<()> {
        let occupied = ACTIVE.with(|slot| slot.borrow().is_some());
        if occupied {
            return Err(HookError::AlreadyInstalled);
        }

        // SAFETY: plain Win32 calls; a null module name yields the handle of
        // the current module, which is what a WH_KEYBOARD_LL hook expects.
        let handle = unsafe {
            let hmod = GetModuleHandleW(ptr::null());
            SetWindowsHookExW(WH_KEYBOARD_LL, keyboard_hook_proc, hmod, 0)
        };

        if handle.is_null() {
            return Err(HookError::Install(unsafe { GetLastError() }));
        }

        ACTIVE.with(|slot| {
            *slot.borrow_mut() = Some(ActiveHook {
                handle,
                core: core as *const _,
            });
        });
        debug!("WH_KEYBOARD_LL hook installed");

        Ok(())
    }

    fn uninstall(&mut self) -> HookResult<()> {
        let Some(active) = ACTIVE.with(|slot| slot.borrow_mut().take()) else {
            return Ok(());
        };

        // SAFETY: the handle came from a successful SetWindowsHookExW on this
        // thread and has not been unhooked yet.
        if unsafe { UnhookWindowsHookEx(active.handle) } == 0 {
            return Err(HookError::Uninstall(unsafe { GetLastError() }));
        }
        debug!("WH_KEYBOARD_LL hook removed");

        Ok(())
    }
}

extern "system" fn keyboard_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let action = ACTIVE.with(|slot| {
        let slot = slot.borrow();
        let Some(active) = slot.as_ref() else {
            return HookAction::Forward;
        };
        if code < 0 {
            return HookAction::Forward;
        }

        // SAFETY: for a non-negative hook code, lparam points at the OS's key
        // record for the duration of this call. The core pointer stays valid
        // while the hook is installed (see the `HookDriver` contract).
        let record = unsafe { (lparam as *const RawKeyRecord).as_ref() };
        let Some(record) = record else {
            return HookAction::Forward;
        };
        let core = unsafe { &*active.core };

        match core.try_borrow_mut() {
            Ok(mut core) => core.dispatch(code, wparam, record),
            // Re-entered from a nested message loop inside a subscriber.
            Err(_) => HookAction::Forward,
        }
    });

    match action {
        HookAction::Suppress => 1,
        // The handle argument to CallNextHookEx is ignored on current
        // Windows versions.
        HookAction::Forward => unsafe { CallNextHookEx(ptr::null_mut(), code, wparam, lparam) },
    }
}

/// A keyboard hook backed by the real Windows driver.
pub type GlobalKeyboardHook = KeyboardHook<WindowsHookDriver>;

impl GlobalKeyboardHook {
    pub fn new() -> Self {
        KeyboardHook::with_driver(WindowsHookDriver::new())
    }
}

impl Default for GlobalKeyboardHook {
    fn default() -> Self {
        Self::new()
    }
}

/// Pump messages on the hook thread until `WM_QUIT`.
///
/// A low-level hook only receives callbacks while its thread runs a live
/// message loop; call this (or run your own loop) after
/// [`start`](KeyboardHook::start).
pub fn run_message_loop() {
    // SAFETY: plain Win32 message pumping with a stack-allocated MSG.
    unsafe {
        let mut msg = std::mem::zeroed::<MSG>();
        while GetMessageW(&mut msg, ptr::null_mut(), 0, 0) > 0 {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
