//! Order store port.
//!
//! The fulfillment transition is the one operation that needs real mutual
//! exclusion. Implementations must make `fulfill_product` an atomic
//! conditional update scoped to a single order: concurrent calls on
//! different lines of the same order both succeed, calls on different
//! orders never wait on each other, and the returned order reflects every
//! committed line, not a cached count.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, ProductId, Timestamp};
use crate::domain::order::Order;

/// Result of a cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The order was open and is now cancelled.
    Cancelled(Order),
    /// The order had already been cancelled; nothing changed.
    AlreadyCancelled(Order),
}

impl CancelOutcome {
    pub fn order(&self) -> &Order {
        match self {
            CancelOutcome::Cancelled(order) | CancelOutcome::AlreadyCancelled(order) => order,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, CancelOutcome::Cancelled(_))
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order and one pending line per entry of `lines`, as one unit.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `lines` is empty
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn insert_order(
        &self,
        created_at: Timestamp,
        lines: &[ProductId],
    ) -> Result<Order, DomainError>;

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Move every pending line of `product_id` on the order to fulfilled and
    /// return the order as it stands after the commit.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order doesn't exist
    /// - `OrderLineNotFound` if the order has no line for the product
    /// - `Conflict` if the order is cancelled or the lines were already fulfilled
    async fn fulfill_product(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<Order, DomainError>;

    /// Cancel an order. Cancelling twice is not an error.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order doesn't exist
    async fn cancel_order(&self, id: OrderId) -> Result<CancelOutcome, DomainError>;
}
