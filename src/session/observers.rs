//! Change observers for the session store.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by a registration; pass it back to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Ordered list of zero-argument callbacks.
///
/// Callbacks run in registration order. The list is copied before a
/// notification round, so a callback may register or deregister observers
/// (including itself) without deadlocking; such changes take effect from the
/// next round. A callback that panics is logged and skipped, the rest of the
/// round still runs.
pub struct ObserverRegistry {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(callback)));
        Subscription { id }
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|(id, _)| *id != subscription.id);
        guard.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every registered callback once, in registration order.
    ///
    /// Returns the number of callbacks that panicked.
    pub fn notify(&self) -> usize {
        let round: Vec<(u64, Callback)> = self
            .lock()
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();

        let mut failures = 0;
        for (id, callback) in round {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                failures += 1;
                tracing::warn!(
                    name: "session.observer.panicked",
                    observer = id,
                    "Session observer panicked; continuing with remaining observers"
                );
            }
        }
        failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Callback)>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
