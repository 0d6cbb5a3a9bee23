//! Read-side order handlers.
//!
//! - `GetOrderHandler` - fetch one order
//! - `AnnounceOrderHandler` - re-publish an order's current aggregate as
//!   `OrderUpdated`, used by reconnecting devices to resynchronise. Only a
//!   requester that would receive the announcement may trigger it.

use std::sync::Arc;

use crate::domain::events::{DomainEvent, OrderUpdatedPayload};
use crate::domain::foundation::{AuthScope, OrderId};
use crate::domain::order::{Order, OrderError};
use crate::domain::routing::StationRouter;
use crate::application::handlers::OrderLocks;
use crate::ports::{EventPublisher, OrderStore};

#[derive(Debug, Clone, Copy)]
pub struct GetOrderQuery {
    pub order_id: OrderId,
}

pub struct GetOrderHandler {
    orders: Arc<dyn OrderStore>,
}

impl GetOrderHandler {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, query: GetOrderQuery) -> Result<Order, OrderError> {
        self.orders
            .find_order(query.order_id)
            .await?
            .ok_or_else(|| OrderError::order_not_found(query.order_id))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnnounceOrderCommand {
    /// Who asked.
    pub scope: AuthScope,
    pub order_id: OrderId,
}

/// Publishes `OrderUpdated` for an order without changing it.
///
/// Takes the order's lock so the snapshot it announces is never older than
/// an event already sequenced for that order.
pub struct AnnounceOrderHandler {
    orders: Arc<dyn OrderStore>,
    publisher: Arc<dyn EventPublisher>,
    router: Arc<StationRouter>,
    locks: OrderLocks,
}

impl AnnounceOrderHandler {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        publisher: Arc<dyn EventPublisher>,
        router: Arc<StationRouter>,
        locks: OrderLocks,
    ) -> Self {
        Self {
            orders,
            publisher,
            router,
            locks,
        }
    }

    /// Returns the sequence number of the announcement.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order doesn't exist, or if the requester is
    ///   outside the order's audience
    pub async fn handle(&self, cmd: AnnounceOrderCommand) -> Result<u64, OrderError> {
        let _guard = self.locks.lock(cmd.order_id).await;
        let order = self
            .orders
            .find_order(cmd.order_id)
            .await?
            .ok_or_else(|| OrderError::order_not_found(cmd.order_id))?;

        let event = DomainEvent::OrderUpdated(OrderUpdatedPayload::new(&order));
        if !self.router.audience_for(&event).admits(&cmd.scope) {
            tracing::debug!(
                order_id = %cmd.order_id,
                role = ?cmd.scope.role,
                station_id = ?cmd.scope.station_id,
                "announce refused outside audience"
            );
            return Err(OrderError::order_not_found(cmd.order_id));
        }

        let sequence = self.publisher.publish(event);
        tracing::debug!(order_id = %cmd.order_id, sequence, "order state announced");
        Ok(sequence)
    }
}
