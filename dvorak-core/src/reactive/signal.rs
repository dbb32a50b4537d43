//! Signal Implementation
//!
//! A signal is the fundamental reactive primitive. It holds a value and an
//! ordered list of subscribers.
//!
//! # How Signals Work
//!
//! 1. [`create_signal`] returns a read accessor and a write mutator that
//!    share one value cell.
//!
//! 2. Reading is side-effect free. Nothing is tracked automatically; code
//!    that wants to react registers a subscriber explicitly.
//!
//! 3. Writing replaces the value, then runs every subscriber registered at
//!    the moment of the write, in registration order, synchronously.
//!
//! # Re-entrancy
//!
//! The subscriber list is snapshotted before dispatch and no borrow is held
//! while callbacks run. A callback may read or write any signal (including
//! the one notifying it) and may subscribe or unsubscribe freely. Subscribers
//! added during a dispatch first run on the next write.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use super::subscriber::{Callback, SubscriberId, Subscription, Unsubscribe};

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

struct SignalInner<T> {
    id: u64,
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriberId, Callback)>>,
}

impl<T> SignalInner<T> {
    fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in callbacks {
            callback();
        }
    }
}

impl<T> Unsubscribe for SignalInner<T> {
    fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
    }
}

/// Create a signal holding `initial`.
///
/// # Example
///
/// ```rust
/// use dvorak_core::reactive::create_signal;
///
/// let (count, set_count) = create_signal(0);
/// set_count.set(1);
/// assert_eq!(count.get(), 1);
/// ```
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let inner = Rc::new(SignalInner {
        id: next_signal_id(),
        value: RefCell::new(initial),
        subscribers: RefCell::new(Vec::new()),
    });

    (
        ReadSignal {
            inner: Rc::clone(&inner),
        },
        WriteSignal { inner },
    )
}

/// Read accessor of a signal.
///
/// Cloning the accessor is cheap and every clone observes the same cell.
pub struct ReadSignal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> ReadSignal<T> {
    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Append `callback` to the subscriber list.
    ///
    /// The callback runs on every later write; past writes are never
    /// replayed.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.subscribe_rc(Rc::new(callback))
    }

    pub(crate) fn subscribe_rc(&self, callback: Callback) -> Subscription {
        let id = SubscriberId::new();
        self.inner.subscribers.borrow_mut().push((id, callback));

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        let source: Weak<dyn Unsubscribe> = weak;
        Subscription::new(id, source)
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Weak accessor that does not keep the signal alive.
    ///
    /// Subscribers that need to read their own signal hold one of these, so
    /// the signal's subscriber list never owns the signal.
    pub fn downgrade(&self) -> WeakReadSignal<T> {
        WeakReadSignal {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning form of [`ReadSignal`].
pub struct WeakReadSignal<T> {
    inner: Weak<SignalInner<T>>,
}

impl<T> WeakReadSignal<T> {
    /// Recover the accessor if the signal still exists.
    pub fn upgrade(&self) -> Option<ReadSignal<T>> {
        self.inner.upgrade().map(|inner| ReadSignal { inner })
    }
}

impl<T> Clone for WeakReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSignal")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .field("subscriber_count", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// Write mutator of a signal.
pub struct WriteSignal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> WriteSignal<T> {
    /// Set a new value and notify subscribers.
    pub fn set(&self, value: T) {
        let previous = self.inner.value.replace(value);
        drop(previous);

        self.inner.notify();
    }

    /// Update the value using a function of the current value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.value.borrow());
        self.set(next);
    }
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteSignal")
            .field("id", &self.inner.id)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
