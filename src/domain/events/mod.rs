//! Domain events distributed to live connections.
//!
//! Events are ephemeral: they are sequenced when published, fanned out to
//! whoever is connected at that moment, and never stored or replayed.
//!
//! - `DomainEvent` - closed set of event kinds, one payload type per kind
//! - `Event` - a published event: sequence, timestamp, audience, payload

mod payloads;

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::routing::Audience;

pub use payloads::{
    LineProduct, OrderCancelledPayload, OrderCreatedPayload, OrderLinePayload,
    OrderProductFulfilledPayload, OrderUpdatedPayload, ProductDiscontinuedPayload,
    ProductPayload,
};

/// Discriminant of a [`DomainEvent`], used as the wire `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    ProductCreated,
    ProductUpdated,
    ProductDiscontinued,
    OrderCreated,
    OrderUpdated,
    OrderProductFulfilled,
    OrderCancelled,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ProductCreated => "ProductCreated",
            EventKind::ProductUpdated => "ProductUpdated",
            EventKind::ProductDiscontinued => "ProductDiscontinued",
            EventKind::OrderCreated => "OrderCreated",
            EventKind::OrderUpdated => "OrderUpdated",
            EventKind::OrderProductFulfilled => "OrderProductFulfilled",
            EventKind::OrderCancelled => "OrderCancelled",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an event is about, for audience resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope<'a> {
    /// A single catalog product.
    Product(ProductId),
    /// An order, through every product it contains.
    Order(&'a BTreeSet<ProductId>),
}

/// Every event the system publishes.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    ProductCreated(ProductPayload),
    ProductUpdated(ProductPayload),
    ProductDiscontinued(ProductDiscontinuedPayload),
    OrderCreated(OrderCreatedPayload),
    OrderUpdated(OrderUpdatedPayload),
    OrderProductFulfilled(OrderProductFulfilledPayload),
    OrderCancelled(OrderCancelledPayload),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::ProductCreated(_) => EventKind::ProductCreated,
            DomainEvent::ProductUpdated(_) => EventKind::ProductUpdated,
            DomainEvent::ProductDiscontinued(_) => EventKind::ProductDiscontinued,
            DomainEvent::OrderCreated(_) => EventKind::OrderCreated,
            DomainEvent::OrderUpdated(_) => EventKind::OrderUpdated,
            DomainEvent::OrderProductFulfilled(_) => EventKind::OrderProductFulfilled,
            DomainEvent::OrderCancelled(_) => EventKind::OrderCancelled,
        }
    }

    pub fn scope(&self) -> EventScope<'_> {
        match self {
            DomainEvent::ProductCreated(p) | DomainEvent::ProductUpdated(p) => {
                EventScope::Product(p.id)
            }
            DomainEvent::ProductDiscontinued(p) => EventScope::Product(p.id),
            DomainEvent::OrderCreated(p) => EventScope::Order(&p.products),
            DomainEvent::OrderUpdated(p) => EventScope::Order(&p.products),
            DomainEvent::OrderProductFulfilled(p) => EventScope::Order(&p.products),
            DomainEvent::OrderCancelled(p) => EventScope::Order(&p.products),
        }
    }

    /// Products whose stations should see this event.
    pub fn routed_products(&self) -> BTreeSet<ProductId> {
        match self.scope() {
            EventScope::Product(id) => BTreeSet::from([id]),
            EventScope::Order(products) => products.clone(),
        }
    }

    /// Serializes the kind-specific payload.
    pub fn payload_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            DomainEvent::ProductCreated(p) | DomainEvent::ProductUpdated(p) => {
                serde_json::to_value(p)
            }
            DomainEvent::ProductDiscontinued(p) => serde_json::to_value(p),
            DomainEvent::OrderCreated(p) => serde_json::to_value(p),
            DomainEvent::OrderUpdated(p) => serde_json::to_value(p),
            DomainEvent::OrderProductFulfilled(p) => serde_json::to_value(p),
            DomainEvent::OrderCancelled(p) => serde_json::to_value(p),
        }
    }
}

/// A published event.
///
/// `sequence` is assigned by the bus at publish time and is strictly
/// increasing within the process. `audience` is resolved once, before
/// fan-out, so every subscriber filter sees the same routing decision.
#[derive(Debug, Clone)]
pub struct Event {
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub audience: Audience,
    pub payload: DomainEvent,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, ProductTypeId};
    use crate::domain::order::AggregateStatus;

    fn product_payload(id: i64) -> ProductPayload {
        ProductPayload {
            id: ProductId::new(id),
            name: "Fries".to_string(),
            price: 3.0,
            type_id: ProductTypeId::new(1),
            discontinued: false,
            sold_out: false,
        }
    }

    #[test]
    fn product_payload_uses_wire_field_names() {
        let event = DomainEvent::ProductUpdated(product_payload(7));
        let json = event.payload_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Fries",
                "price": 3.0,
                "typeId": 1,
                "discontinued": false,
                "soldOut": false
            })
        );
        assert_eq!(event.kind(), EventKind::ProductUpdated);
    }

    #[test]
    fn routing_products_are_not_serialized() {
        let event = DomainEvent::OrderProductFulfilled(OrderProductFulfilledPayload {
            order_id: OrderId::new(1),
            product_id: ProductId::new(2),
            aggregate_status: AggregateStatus::Complete,
            products: BTreeSet::from([ProductId::new(2), ProductId::new(3)]),
        });
        let json = event.payload_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({"orderId": 1, "productId": 2, "aggregateStatus": "complete"})
        );
        assert_eq!(
            event.routed_products(),
            BTreeSet::from([ProductId::new(2), ProductId::new(3)])
        );
    }

    #[test]
    fn product_event_routes_by_its_product() {
        let event = DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload {
            id: ProductId::new(4),
        });
        assert_eq!(event.scope(), EventScope::Product(ProductId::new(4)));
        assert_eq!(event.routed_products(), BTreeSet::from([ProductId::new(4)]));
    }

    #[test]
    fn kind_names_match_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventKind::OrderCancelled).unwrap(),
            format!("\"{}\"", EventKind::OrderCancelled.as_str())
        );
    }
}
