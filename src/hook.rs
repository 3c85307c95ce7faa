use std::cell::RefCell;

use tracing::{error, info, warn};

use crate::channel::{NotificationChannel, NotificationStream, SubscriptionId};
use crate::error::{HookError, HookResult};
use crate::event::{KeyEventCause, KeyNotification, RawKeyRecord};
use crate::key_code::{KeyCode, KeyCodeSet};
use crate::state::ModifierState;

/// The decision the hook procedure returns to the OS for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Pass the event to the next procedure in the hook chain, unmodified.
    Forward,
    /// Swallow the event; it never reaches the rest of the input pipeline.
    Suppress,
}

/// Filtering, state tracking and subscriber dispatch for one hook.
///
/// The core is platform-independent: a [`HookDriver`] feeds it raw callbacks
/// and translates the returned [`HookAction`] into the platform's hook-chain
/// protocol. This keeps the decision path testable without a live OS hook.
pub struct HookCore {
    keys: KeyCodeSet,
    state: ModifierState,
    channel: NotificationChannel,
    error_sink: Option<Box<dyn FnMut(HookError)>>,
}

impl HookCore {
    fn new() -> Self {
        Self {
            keys: KeyCodeSet::new(),
            state: ModifierState::default(),
            channel: NotificationChannel::default(),
            error_sink: None,
        }
    }

    /// Decide what to do with one raw callback from the OS.
    ///
    /// Events with a negative hook code, an unknown event-type sentinel, an
    /// undecodable virtual-key code or a key outside the watched set are
    /// forwarded without touching any state. Everything else updates the
    /// modifier state and is published to the matching stream; a subscriber
    /// marking the notification handled suppresses the native event.
    pub(crate) fn dispatch(
        &mut self,
        code: i32,
        wparam: usize,
        record: &RawKeyRecord,
    ) -> HookAction {
        if code < 0 {
            return HookAction::Forward;
        }

        let Some(cause) = KeyEventCause::from_wparam(wparam) else {
            return HookAction::Forward;
        };

        // An unmapped virtual-key code is not an error: fail open so the
        // event still reaches the rest of the input pipeline.
        let Some(key) = KeyCode::from_raw(record.vk_code) else {
            return HookAction::Forward;
        };

        if !self.keys.contains(key) {
            return HookAction::Forward;
        }

        self.state.apply(cause, key);

        let stream = match cause {
            KeyEventCause::Press => NotificationStream::KeyDown,
            KeyEventCause::Release => NotificationStream::KeyUp,
        };

        let mut note = KeyNotification::new(key, self.state);
        for failure in self.channel.publish(stream, &mut note) {
            match &mut self.error_sink {
                Some(sink) => sink(failure),
                None => error!("{failure}"),
            }
        }

        if note.handled {
            HookAction::Suppress
        } else {
            HookAction::Forward
        }
    }
}

/// The platform hook driver: installs and removes the OS-level hook.
///
/// One real implementation exists per target OS (`WindowsHookDriver` on
/// Windows); test code substitutes a fake so the dispatch path runs without a
/// live hook.
///
/// A driver may stash a pointer to the core it received in `install`:
/// [`KeyboardHook`] keeps the core at a stable address and always calls
/// `uninstall` before dropping it.
pub trait HookDriver {
    fn install(&mut self, core: &RefCell<HookCore>) -> HookResult<()>;
    fn uninstall(&mut self) -> HookResult<()>;
}

/// A global keyboard hook: watched-key filtering, shift/alphabetic tracking
/// and key-down/key-up subscriber streams over a platform driver.
///
/// The OS hook is an externally-managed resource with no automatic cleanup,
/// so it is modeled as a scoped one: [`start`](Self::start) acquires it,
/// [`stop`](Self::stop) releases it, and dropping the hook releases it on any
/// exit path. The OS delivers callbacks synchronously on the thread that
/// called `start`, which must keep pumping messages; a slow subscriber stalls
/// keyboard input system-wide for its duration.
pub struct KeyboardHook<D: HookDriver> {
    // Boxed so the address stays stable while a driver holds a pointer to it.
    core: Box<RefCell<HookCore>>,
    driver: D,
    installed: bool,
}

impl<D: HookDriver> KeyboardHook<D> {
    pub fn with_driver(driver: D) -> Self {
        Self {
            core: Box::new(RefCell::new(HookCore::new())),
            driver,
            installed: false,
        }
    }

    /// Add a key to the watched set.
    pub fn register_key(&mut self, key: KeyCode) {
        self.core.borrow_mut().keys.register(key);
    }

    /// Remove a key from the watched set.
    pub fn unregister_key(&mut self, key: KeyCode) {
        self.core.borrow_mut().keys.unregister(key);
    }

    /// Watch every representable virtual-key code.
    pub fn register_all_keys(&mut self) {
        self.core.borrow_mut().keys.register_all();
    }

    /// Empty the watched set.
    pub fn unregister_all_keys(&mut self) {
        self.core.borrow_mut().keys.unregister_all();
    }

    /// Subscribe to key-press notifications.
    pub fn on_key_down(
        &mut self,
        subscriber: impl FnMut(&mut KeyNotification) + 'static,
    ) -> SubscriptionId {
        self.core
            .borrow_mut()
            .channel
            .subscribe(NotificationStream::KeyDown, Box::new(subscriber))
    }

    /// Subscribe to key-release notifications.
    pub fn on_key_up(
        &mut self,
        subscriber: impl FnMut(&mut KeyNotification) + 'static,
    ) -> SubscriptionId {
        self.core
            .borrow_mut()
            .channel
            .subscribe(NotificationStream::KeyUp, Box::new(subscriber))
    }

    /// Detach a subscriber. Returns `false` if the id is not attached to the
    /// stream.
    pub fn unsubscribe(&mut self, stream: NotificationStream, id: SubscriptionId) -> bool {
        self.core.borrow_mut().channel.unsubscribe(stream, id)
    }

    /// Install a sink for subscriber failures. Without one, failures are
    /// logged and otherwise dropped.
    pub fn on_error(&mut self, sink: impl FnMut(HookError) + 'static) {
        self.core.borrow_mut().error_sink = Some(Box::new(sink));
    }

    /// Install the OS hook.
    ///
    /// At most one hook per [`KeyboardHook`] may be active: a second `start`
    /// without an intervening [`stop`](Self::stop) is rejected with
    /// [`HookError::AlreadyInstalled`] rather than replacing the first.
    pub fn start(&mut self) -> HookResult<()> {
        if self.installed {
            return Err(HookError::AlreadyInstalled);
        }

        self.driver.install(&self.core)?;
        self.installed = true;
        info!("keyboard hook installed");

        Ok(())
    }

    /// Remove the OS hook. Calling `stop` with no active hook is a no-op.
    pub fn stop(&mut self) -> HookResult<()> {
        if !self.installed {
            return Ok(());
        }

        self.driver.uninstall()?;
        self.installed = false;
        info!("keyboard hook removed");

        Ok(())
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Snapshot of the current shift/alphabetic context.
    pub fn modifier_state(&self) -> ModifierState {
        self.core.borrow().state
    }

    /// Feed one raw callback through the decision path.
    ///
    /// Platform drivers call this from the OS hook procedure; tests call it
    /// to simulate keyboard events. If the core is already borrowed (the OS
    /// re-entered the procedure from a nested message loop inside a
    /// subscriber), the event is forwarded untouched.
    pub fn dispatch(&self, code: i32, wparam: usize, record: &RawKeyRecord) -> HookAction {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.dispatch(code, wparam, record),
            Err(_) => HookAction::Forward,
        }
    }
}

impl<D: HookDriver> Drop for KeyboardHook<D> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!("failed to remove keyboard hook on drop: {err}");
        }
    }
}
