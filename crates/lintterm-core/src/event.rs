//! Event emitters and disposable subscriptions.
//!
//! An [`Emitter`] keeps a list of listeners keyed by a subscription id.
//! Registering a listener returns a [`Subscription`]; disposing it (or
//! dropping it) removes the listener. Listener invocation order is
//! unspecified.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Something that releases resources when disposed.
///
/// `dispose` must be idempotent.
pub trait Disposable: Send + Sync {
    /// Release the resource.
    fn dispose(&self);
}

/// Listener callback type.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

type ListenerMap<T> = Mutex<HashMap<u64, Listener<T>>>;

/// Multi-listener event source.
pub struct Emitter<T> {
    listeners: Arc<ListenerMap<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> Emitter<T> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_arc(Arc::new(listener))
    }

    /// Register an already shared listener.
    pub fn subscribe_arc(&self, listener: Listener<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).insert(id, listener);

        let listeners: Weak<ListenerMap<T>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                lock(&listeners).remove(&id);
            }
        })
    }

    /// Notify every listener.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe or
    /// dispose subscriptions while being notified.
    pub fn fire(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.listeners).values().cloned().collect();
        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a registered listener or other releasable resource.
///
/// The release callback runs at most once: on the first `dispose()` or on
/// drop, whichever comes first.
pub struct Subscription {
    release: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    /// Create a subscription that runs `release` when disposed.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A subscription that holds nothing.
    pub fn empty() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Whether the subscription has already been released.
    pub fn is_disposed(&self) -> bool {
        lock(&self.release).is_none()
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        let release = lock(&self.release).take();
        if let Some(release) = release {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_fire_reaches_all_listeners() {
        let emitter = Emitter::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let t1 = Arc::clone(&total);
        let _a = emitter.subscribe(move |v| {
            t1.fetch_add(*v as usize, Ordering::SeqCst);
        });
        let t2 = Arc::clone(&total);
        let _b = emitter.subscribe(move |v| {
            t2.fetch_add(*v as usize * 10, Ordering::SeqCst);
        });

        emitter.fire(&2);
        assert_eq!(total.load(Ordering::SeqCst), 22);
        assert_eq!(emitter.listener_count(), 2);
    }

    #[test]
    fn test_dispose_removes_listener() {
        let emitter = Emitter::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let sub = emitter.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.fire(&());
        sub.dispose();
        sub.dispose();
        emitter.fire(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(sub.is_disposed());
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_drop_removes_listener() {
        let emitter = Emitter::<()>::new();
        {
            let _sub = emitter.subscribe(|_| {});
            assert_eq!(emitter.listener_count(), 1);
        }
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_emitter() {
        let emitter = Emitter::<()>::new();
        let sub = emitter.subscribe(|_| {});
        drop(emitter);
        sub.dispose();
        assert!(sub.is_disposed());
    }

    #[test]
    fn test_listener_can_unsubscribe_while_firing() {
        let emitter = Arc::new(Emitter::<()>::new());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let slot_clone = Arc::clone(&slot);
        let c = Arc::clone(&count);
        let sub = emitter.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot_clone.lock().unwrap().take() {
                sub.dispose();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        emitter.fire(&());
        emitter.fire(&());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_subscription() {
        let sub = Subscription::empty();
        assert!(sub.is_disposed());
        sub.dispose();
    }
}
