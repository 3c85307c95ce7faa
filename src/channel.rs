use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::HookError;
use crate::event::KeyNotification;

/// One of the two broadcast streams exposed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStream {
    KeyDown,
    KeyUp,
}

/// Token returned by a subscribe call; needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&mut KeyNotification)>;

/// Publish/subscribe surface with independent key-down and key-up streams.
///
/// Dispatch is synchronous on the hook thread, in subscriber insertion order.
/// A panicking subscriber is isolated: the remaining subscribers still run
/// and the failure is surfaced as [`HookError::Subscriber`] instead of
/// crossing back into the OS callback.
#[derive(Default)]
pub(crate) struct NotificationChannel {
    next_id: u64,
    key_down: Vec<(SubscriptionId, Subscriber)>,
    key_up: Vec<(SubscriptionId, Subscriber)>,
}

impl NotificationChannel {
    pub(crate) fn subscribe(
        &mut self,
        stream: NotificationStream,
        subscriber: Subscriber,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers_mut(stream).push((id, subscriber));
        id
    }

    /// Remove a subscriber. Returns `false` if the id is not attached to the
    /// stream.
    pub(crate) fn unsubscribe(&mut self, stream: NotificationStream, id: SubscriptionId) -> bool {
        let subscribers = self.subscribers_mut(stream);
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Deliver one notification to every subscriber of `stream`, collecting
    /// the failures of any that panicked.
    pub(crate) fn publish(
        &mut self,
        stream: NotificationStream,
        note: &mut KeyNotification,
    ) -> Vec<HookError> {
        let mut failures = Vec::new();

        for (_, subscriber) in self.subscribers_mut(stream) {
            let result = catch_unwind(AssertUnwindSafe(|| subscriber(&mut *note)));
            if let Err(payload) = result {
                failures.push(HookError::Subscriber(panic_message(payload)));
            }
        }

        failures
    }

    fn subscribers_mut(&mut self, stream: NotificationStream) -> &mut Vec<(SubscriptionId, Subscriber)> {
        match stream {
            NotificationStream::KeyDown => &mut self.key_down,
            NotificationStream::KeyUp => &mut self.key_up,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
