//! Latest-value publish/subscribe holder.
//!
//! # Responsibility
//! - Hold one current value and replay it to every new subscriber.
//! - Notify live subscribers synchronously on each distinct update.
//!
//! # Invariants
//! - Subscribing delivers the current value before `subscribe` returns.
//! - Setting a value equal to the current one emits nothing (conflation).
//! - Subscriber callbacks run outside the holder's lock; a callback may
//!   freely read, set, or subscribe without deadlocking.
//! - Dropping a [`Subscription`] unsubscribes; no further deliveries happen
//!   for that subscriber.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// Shared handle to an observable latest-value cell.
///
/// Handles are cheap to clone; all clones observe and mutate the same cell.
pub struct ObservableValue<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> ObservableValue<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        lock_inner(&self.inner).value.clone()
    }

    /// Replaces the current value and notifies subscribers.
    ///
    /// Returns `true` when the value changed. An update equal to the current
    /// value is dropped without notification.
    pub fn set(&self, value: T) -> bool {
        let (snapshot, callbacks) = {
            let mut inner = lock_inner(&self.inner);
            if inner.value == value {
                return false;
            }
            inner.value = value;
            let callbacks: Vec<Callback<T>> = inner
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();
            (inner.value.clone(), callbacks)
        };

        for callback in callbacks {
            (*callback)(&snapshot);
        }
        true
    }

    /// Registers `callback` and immediately delivers the current value.
    ///
    /// The subscription stays live until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let callback: Callback<T> = Arc::new(callback);
        let (id, snapshot) = {
            let mut inner = lock_inner(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            (id, inner.value.clone())
        };

        (*callback)(&snapshot);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock_inner(&inner)
                    .subscribers
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Number of live subscriptions on this cell.
    pub fn subscriber_count(&self) -> usize {
        lock_inner(&self.inner).subscribers.len()
    }
}

// A poisoned lock only means a subscriber callback panicked mid-delivery;
// the stored value itself is always in a consistent state.
fn lock_inner<T>(inner: &Arc<Mutex<Inner<T>>>) -> MutexGuard<'_, Inner<T>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// RAII unsubscribe guard returned by [`ObservableValue::subscribe`].
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
