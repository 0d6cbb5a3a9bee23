//! EventPublisher port - Interface for publishing domain events.
//!
//! Publishing is synchronous and infallible from the caller's point of
//! view: handlers publish after their store write has committed and move
//! on, whatever state the subscribers are in.

use crate::domain::events::DomainEvent;

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - `publish` completes in bounded time regardless of subscriber count or state
/// - Each published event receives a strictly increasing sequence number
/// - Delivery is at-most-once; a saturated subscriber loses events, the caller does not wait
///
/// # Example
///
/// ```ignore
/// let sequence = publisher.publish(DomainEvent::OrderCancelled(payload));
/// tracing::debug!(sequence, "order cancelled");
/// ```
pub trait EventPublisher: Send + Sync {
    /// Publish a single event and return the sequence number assigned to it.
    fn publish(&self, event: DomainEvent) -> u64;
}
