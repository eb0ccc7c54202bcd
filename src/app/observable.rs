//! Minimal reactive value container.
//!
//! The presentation layer observes coordinator state through
//! [`ObservableValue`]: a single-writer, multi-reader holder of the latest
//! value. `set` notifies the subscribers registered at that moment,
//! synchronously and in subscription order, on the caller's task. There is
//! no buffering, no replay for late subscribers, and no implicit thread
//! hopping.
//!
//! # Example
//!
//! ```rust
//! use meridian::app::ObservableValue;
//!
//! let value = ObservableValue::new(0_u32);
//! let handle = value.subscribe(|n| println!("now {n}"));
//! value.set(1);
//! assert_eq!(value.current(), 1);
//! handle.unsubscribe();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
}

struct Inner<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

/// Single-writer, multi-reader latest-value container.
///
/// Cloning the handle is cheap and shares the underlying value; the
/// coordinator keeps one clone for writing while the presentation layer
/// reads and subscribes through another.
pub struct ObservableValue<T> {
    inner: Arc<Mutex<Inner<T>>>,
    next_id: Arc<AtomicU64>,
}

impl<T: Clone> ObservableValue<T> {
    /// Creates a container holding an initial value.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                subscribers: Vec::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns a clone of the current value.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber callback panicked while the internal lock was
    /// held (poisoned mutex).
    #[must_use]
    pub fn current(&self) -> T {
        self.inner.lock().expect("observable lock poisoned").value.clone()
    }

    /// Stores a new value and synchronously notifies current subscribers.
    ///
    /// The subscriber list is snapshotted under the lock and callbacks run
    /// after it is released, so a callback may call [`current`] or
    /// [`subscribe`] without deadlocking. Only subscribers registered before
    /// this call are notified.
    ///
    /// [`current`]: ObservableValue::current
    /// [`subscribe`]: ObservableValue::subscribe
    pub fn set(&self, value: T) {
        let callbacks: Vec<Callback<T>> = {
            let mut inner = self.inner.lock().expect("observable lock poisoned");
            inner.value = value.clone();
            inner.subscribers.iter().map(|s| Arc::clone(&s.callback)).collect()
        };

        for callback in callbacks {
            callback(&value);
        }
    }

    /// Registers a callback for future values.
    ///
    /// The callback sees only values set after this call; the current value
    /// is not replayed. Returns a handle whose `unsubscribe` removes the
    /// callback; dropping the handle without calling it leaves the
    /// subscription active for the container's lifetime.
    #[must_use = "dropping the handle keeps the subscription alive with no way to remove it"]
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock().expect("observable lock poisoned");
        inner.subscribers.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });

        SubscriptionHandle {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug + Clone> std::fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableValue")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

/// Handle identifying one subscription on an [`ObservableValue`].
pub struct SubscriptionHandle<T> {
    id: u64,
    inner: Weak<Mutex<Inner<T>>>,
}

impl<T> SubscriptionHandle<T> {
    /// Removes the subscription; later `set` calls no longer invoke it.
    ///
    /// A no-op if the container has already been dropped.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().expect("observable lock poisoned");
            inner.subscribers.retain(|s| s.id != self.id);
        }
    }
}
