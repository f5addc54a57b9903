//! # Change Notifier
//!
//! Coarse invalidation fan-out: observers learn "the stock map changed"
//! without learning what changed, and re-read the snapshot themselves.
//!
//! Subscriptions are identified by stable handles, never by closure
//! identity, so two identical closures can be registered and removed
//! independently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// An observer callback. Observers are expected to schedule follow-up
/// reads, not write back synchronously from inside the callback.
pub type Observer = Arc<dyn Fn() + Send + Sync>;

/// Fan-out registry of change observers.
///
/// ## Delivery Contract
/// - Each observer is invoked at most once per `publish()` call
/// - Observers run in registration order, though callers must not rely on
///   cross-observer ordering
/// - `publish()` is issued once per committed logical operation, not once
///   per line
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<Vec<(u64, Observer)>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    /// Creates a notifier with no observers.
    pub fn new() -> Self {
        ChangeNotifier {
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers an observer and returns its handle.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(observer)));
        debug!(handle = id, "Observer subscribed");
        SubscriptionHandle(id)
    }

    /// Removes an observer. Returns `false` when the handle was already
    /// removed (or never existed).
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|(id, _)| *id != handle.0);
        let removed = observers.len() != before;
        if removed {
            debug!(handle = handle.0, "Observer unsubscribed");
        }
        removed
    }

    /// Notifies every observer of a committed change.
    ///
    /// Observers are called with the registry lock released: a misbehaving
    /// observer that re-enters `subscribe`/`unsubscribe`/`publish` cannot
    /// deadlock or corrupt the registry, though its ordering is undefined.
    pub fn publish(&self) {
        let observers: Vec<Observer> = self
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer();
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Observer)>> {
        self.observers.lock().expect("observer registry mutex poisoned")
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_publish_reaches_every_observer_once() {
        let notifier = ChangeNotifier::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&first);
        notifier.subscribe(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&second);
        notifier.subscribe(move || {
            s.fetch_add(1, Ordering::SeqCst);
        });

        notifier.publish();
        notifier.publish();

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        let handle = notifier.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        notifier.publish();
        assert!(notifier.unsubscribe(handle));
        notifier.publish();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!notifier.unsubscribe(handle), "double unsubscribe is false");
    }

    #[test]
    fn test_identical_closures_have_distinct_handles() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&calls);
        let h1 = notifier.subscribe(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&calls);
        let _h2 = notifier.subscribe(move || {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(notifier.observer_count(), 2);
        notifier.unsubscribe(h1);
        assert_eq!(notifier.observer_count(), 1);

        notifier.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_subscribe_does_not_deadlock() {
        let notifier = Arc::new(ChangeNotifier::new());

        let inner = Arc::clone(&notifier);
        notifier.subscribe(move || {
            // Contract violation, but must stay safe.
            inner.subscribe(|| {});
        });

        notifier.publish();
        assert_eq!(notifier.observer_count(), 2);
    }
}
