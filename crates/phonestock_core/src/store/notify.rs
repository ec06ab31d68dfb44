//! Change-notification registry.
//!
//! # Responsibility
//! - Track listeners by target with an explicit subscribe/unsubscribe
//!   lifecycle.
//! - Fan change events out to every listener whose target overlaps.
//!
//! # Invariants
//! - Delivery is synchronous, fire-and-forget and carries no diff payload.
//! - Events for the same target reach a given listener in emission order.
//! - The registry lock is released before listeners run, so a listener may
//!   subscribe or unsubscribe without deadlocking.

use crate::store::target::Target;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Callback invoked with the target of a change event.
///
/// Listeners should treat the call as "your view is stale, re-fetch" and
/// return quickly; the store invokes them on the mutating caller's thread.
pub type ChangeListener = Arc<dyn Fn(&Target) + Send + Sync>;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    target: Target,
    listener: ChangeListener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscriptions: BTreeMap<u64, Subscription>,
}

/// Observer registry owned by the store.
///
/// Replaces ambient broadcast with an explicit mapping from target to
/// listener handles.
#[derive(Default)]
pub struct ChangeNotifier {
    registry: Mutex<Registry>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for change events overlapping `target`.
    pub fn subscribe(&self, target: Target, listener: ChangeListener) -> SubscriptionId {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .subscriptions
            .insert(id, Subscription { target, listener });
        SubscriptionId(id)
    }

    /// Removes a listener. Returns whether the handle was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().subscriptions.remove(&id.0).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Delivers one change event to every listener overlapping `event`.
    pub fn notify(&self, event: &Target) {
        let matching: Vec<ChangeListener> = {
            let registry = self.lock();
            registry
                .subscriptions
                .values()
                .filter(|subscription| subscription.target.overlaps(*event))
                .map(|subscription| Arc::clone(&subscription.listener))
                .collect()
        };

        for listener in matching {
            listener(event);
        }
    }

    // Registration never panics while the lock is held, so a poisoned lock
    // still guards a consistent registry.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeNotifier, Target};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_listener() -> (Arc<AtomicUsize>, super::ChangeListener) {
        let hits = Arc::new(AtomicUsize::new(0));
        let listener_hits = Arc::clone(&hits);
        let listener: super::ChangeListener = Arc::new(move |_event: &Target| {
            listener_hits.fetch_add(1, Ordering::SeqCst);
        });
        (hits, listener)
    }

    #[test]
    fn delivers_to_overlapping_listeners_only() {
        let notifier = ChangeNotifier::new();
        let (collection_hits, collection_listener) = counting_listener();
        let (record_hits, record_listener) = counting_listener();
        let (other_hits, other_listener) = counting_listener();

        notifier.subscribe(Target::Collection, collection_listener);
        notifier.subscribe(Target::Record(1), record_listener);
        notifier.subscribe(Target::Record(2), other_listener);

        notifier.notify(&Target::Record(1));

        assert_eq!(collection_hits.load(Ordering::SeqCst), 1);
        assert_eq!(record_hits.load(Ordering::SeqCst), 1);
        assert_eq!(other_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn collection_events_reach_record_listeners() {
        let notifier = ChangeNotifier::new();
        let (record_hits, record_listener) = counting_listener();
        notifier.subscribe(Target::Record(7), record_listener);

        notifier.notify(&Target::Collection);
        assert_eq!(record_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let notifier = ChangeNotifier::new();
        let (hits, listener) = counting_listener();
        let id = notifier.subscribe(Target::Collection, listener);
        assert_eq!(notifier.subscriber_count(), 1);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert_eq!(notifier.subscriber_count(), 0);

        notifier.notify(&Target::Collection);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_delivery() {
        let notifier = Arc::new(ChangeNotifier::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let id_slot = Arc::new(std::sync::Mutex::new(None));

        let notifier_inner = Arc::clone(&notifier);
        let id_slot_inner = Arc::clone(&id_slot);
        let hits_inner = Arc::clone(&hits);
        let self_removing: super::ChangeListener = Arc::new(move |_event: &Target| {
            hits_inner.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *id_slot_inner.lock().expect("slot lock") {
                notifier_inner.unsubscribe(id);
            }
        });

        let id = notifier.subscribe(Target::Collection, self_removing);
        *id_slot.lock().expect("slot lock") = Some(id);

        notifier.notify(&Target::Collection);
        notifier.notify(&Target::Collection);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
