//! Ordered registry of disposables.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lintterm_core::Disposable;

#[derive(Default)]
struct Registry {
    disposed: bool,
    items: Vec<Arc<dyn Disposable>>,
}

/// Collects disposables and releases them in reverse registration order.
///
/// Anything pushed after the registry was disposed is disposed immediately.
#[derive(Default)]
pub struct DisposableRegistry {
    inner: Mutex<Registry>,
}

impl DisposableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `item`.
    pub fn push(&self, item: Arc<dyn Disposable>) {
        let mut registry = self.lock();
        if registry.disposed {
            drop(registry);
            item.dispose();
            return;
        }
        registry.items.push(item);
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether the registry has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }
}

impl Disposable for DisposableRegistry {
    fn dispose(&self) {
        let items = {
            let mut registry = self.lock();
            registry.disposed = true;
            std::mem::take(&mut registry.items)
        };
        for item in items.iter().rev() {
            item.dispose();
        }
    }
}

impl std::fmt::Debug for DisposableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        f.debug_struct("DisposableRegistry")
            .field("items", &registry.items.len())
            .field("disposed", &registry.disposed)
            .finish()
    }
}
