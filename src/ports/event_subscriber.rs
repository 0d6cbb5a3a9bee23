//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! A subscription pairs a filter with a sink. The bus evaluates the filter
//! for every published event and offers matching events to the sink. Sinks
//! must never block: they accept, evict, or report that they are stuck.

use std::fmt;
use std::sync::Arc;

use crate::domain::events::Event;

/// Handle returned by [`EventSubscriber::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Predicate deciding whether a subscription wants an event.
pub type EventFilter = Box<dyn Fn(&Event) -> bool + Send + Sync>;

/// Outcome of offering an event to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Enqueued with room to spare.
    Queued,
    /// Enqueued after dropping the oldest pending event.
    Evicted,
    /// The sink has stopped draining; the bus must drop the subscription.
    Stalled,
    /// The sink is already closed.
    Closed,
}

/// Receiving end of a subscription.
///
/// Both methods are called while the bus holds its registry lock, so they
/// must return promptly and must not call back into the bus.
pub trait EventSink: Send + Sync {
    /// Offer an event without blocking.
    fn offer(&self, event: Arc<Event>) -> Offer;

    /// Close the sink. Must be idempotent.
    fn close(&self);
}

/// Port for subscribing to domain events.
///
/// # Example
///
/// ```ignore
/// let id = bus.subscribe(Box::new(move |e: &Event| e.audience.admits(&scope)), queue.clone());
/// // ... later, from any teardown path:
/// bus.unsubscribe(id);
/// bus.unsubscribe(id); // no-op
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Register a sink. Events published after this returns are offered to
    /// it in publish order whenever `filter` accepts them.
    fn subscribe(&self, filter: EventFilter, sink: Arc<dyn EventSink>) -> SubscriptionId;

    /// Remove a subscription and close its sink in one step.
    ///
    /// Returns false if the subscription was already gone. Safe to call
    /// repeatedly and concurrently with `publish`.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventSubscriber, _: &dyn EventSink, _: &dyn EventBus) {}

    #[test]
    fn subscription_id_displays_with_prefix() {
        assert_eq!(SubscriptionId::new(12).to_string(), "sub-12");
        assert_eq!(SubscriptionId::new(12).value(), 12);
    }
}
