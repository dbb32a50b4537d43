//! Subscriber types for the reactive system.
//!
//! A subscriber is a callback registered on a signal. It runs with no
//! arguments every time the signal is written. Registration hands back a
//! [`Subscription`], which is the only way to remove the callback again.

use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked when a signal is written.
pub type Callback = Rc<dyn Fn()>;

/// Unique identifier for a subscriber.
///
/// Each registration gets a fresh ID, so the same closure subscribed twice
/// yields two independent subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Something a subscriber can be detached from.
pub(crate) trait Unsubscribe {
    fn unsubscribe(&self, id: SubscriberId);
}

/// Handle to one registered subscriber.
///
/// Dropping the handle leaves the subscriber in place; call
/// [`Subscription::unsubscribe`] to remove it. The handle only holds a weak
/// reference to the signal, so keeping it around never keeps a signal alive.
pub struct Subscription {
    id: SubscriberId,
    source: Weak<dyn Unsubscribe>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, source: Weak<dyn Unsubscribe>) -> Self {
        Self { id, source }
    }

    /// Get the subscriber's unique ID.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the signal this subscription belongs to still exists.
    pub fn is_live(&self) -> bool {
        self.source.strong_count() > 0
    }

    /// Remove the subscriber from its signal.
    ///
    /// Does nothing if the signal has already been dropped.
    pub fn unsubscribe(self) {
        if let Some(source) = self.source.upgrade() {
            source.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<SubscriberId>>);

    impl Unsubscribe for Recorder {
        fn unsubscribe(&self, id: SubscriberId) {
            self.0.borrow_mut().push(id);
        }
    }

    #[test]
    fn subscriber_ids_are_unique() {
        let id1 = SubscriberId::new();
        let id2 = SubscriberId::new();
        let id3 = SubscriberId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn unsubscribe_reaches_source() {
        let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
        let source: Rc<dyn Unsubscribe> = recorder.clone();
        let id = SubscriberId::new();

        let subscription = Subscription::new(id, Rc::downgrade(&source));
        assert!(subscription.is_live());
        subscription.unsubscribe();

        assert_eq!(*recorder.0.borrow(), vec![id]);
    }

    #[test]
    fn unsubscribe_after_source_dropped_is_noop() {
        let source: Rc<dyn Unsubscribe> = Rc::new(Recorder(RefCell::new(Vec::new())));
        let subscription = Subscription::new(SubscriberId::new(), Rc::downgrade(&source));
        drop(source);

        assert!(!subscription.is_live());
        subscription.unsubscribe();
    }
}
