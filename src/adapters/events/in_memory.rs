//! In-process event bus.
//!
//! One bus instance is built at startup and shared by reference with every
//! publisher and subscriber; there is no global.
//!
//! # Delivery
//!
//! `publish` resolves the event's audience, then takes the registry lock,
//! assigns the next sequence number and offers the event to every matching
//! sink before releasing it. Holding one lock across sequencing and fan-out
//! is what makes per-subscriber delivery follow publish order, and it makes
//! `unsubscribe` a single step: once it returns, no publish can reach the
//! removed sink.
//!
//! Sinks never block (see [`EventSink`]), so the critical section is O(N)
//! non-blocking enqueues. A sink that reports itself stalled is removed and
//! closed inside the same critical section.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::events::{DomainEvent, Event};
use crate::domain::foundation::Timestamp;
use crate::domain::routing::StationRouter;
use crate::ports::{EventFilter, EventPublisher, EventSink, EventSubscriber, Offer, SubscriptionId};

struct Subscription {
    filter: EventFilter,
    sink: Arc<dyn EventSink>,
}

#[derive(Default)]
struct Registry {
    last_sequence: u64,
    last_subscription: u64,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

/// In-memory publish/subscribe bus.
///
/// # Example
///
/// ```ignore
/// let router = Arc::new(StationRouter::new(index));
/// let bus = Arc::new(InMemoryEventBus::new(router));
///
/// let id = bus.subscribe(Box::new(|_: &Event| true), queue.clone());
/// let seq = bus.publish(event);
/// bus.unsubscribe(id);
/// ```
pub struct InMemoryEventBus {
    router: Arc<StationRouter>,
    registry: Mutex<Registry>,
}

impl InMemoryEventBus {
    pub fn new(router: Arc<StationRouter>) -> Self {
        Self {
            router,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry().subscriptions.len()
    }

    /// Sequence number of the most recently published event, 0 if none.
    pub fn last_sequence(&self) -> u64 {
        self.registry().last_sequence
    }

    // A panicking filter must not take the bus down with it.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, payload: DomainEvent) -> u64 {
        let audience = self.router.audience_for(&payload);
        let kind = payload.kind();

        let mut registry = self.registry();
        registry.last_sequence += 1;
        let sequence = registry.last_sequence;
        let event = Arc::new(Event {
            sequence,
            timestamp: Timestamp::now(),
            audience,
            payload,
        });

        let mut offered = 0usize;
        let mut dead = Vec::new();
        for (id, subscription) in registry.subscriptions.iter() {
            if !(subscription.filter)(&event) {
                continue;
            }
            offered += 1;
            match subscription.sink.offer(Arc::clone(&event)) {
                Offer::Queued => {}
                Offer::Evicted => {
                    tracing::debug!(subscription = %id, sequence, "queue full, oldest event evicted");
                }
                Offer::Stalled => {
                    tracing::warn!(subscription = %id, sequence, "subscriber stalled, removing");
                    dead.push(*id);
                }
                Offer::Closed => dead.push(*id),
            }
        }

        for id in dead {
            if let Some(subscription) = registry.subscriptions.remove(&id) {
                subscription.sink.close();
            }
        }
        drop(registry);

        tracing::trace!(sequence, kind = %kind, offered, "event published");
        sequence
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let mut registry = self.registry();
        registry.last_subscription += 1;
        let id = SubscriptionId::new(registry.last_subscription);
        registry
            .subscriptions
            .insert(id, Subscription { filter, sink });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.registry().subscriptions.remove(&id);
        match removed {
            Some(subscription) => {
                subscription.sink.close();
                true
            }
            None => false,
        }
    }
}
