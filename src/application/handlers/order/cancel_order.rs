//! CancelOrderHandler - Command handler for cancelling whole orders.

use std::sync::Arc;

use crate::domain::events::{DomainEvent, OrderCancelledPayload};
use crate::domain::foundation::OrderId;
use crate::domain::order::{Order, OrderError};
use crate::application::handlers::OrderLocks;
use crate::ports::{EventPublisher, OrderStore};

#[derive(Debug, Clone, Copy)]
pub struct CancelOrderCommand {
    pub order_id: OrderId,
}

/// Handler for cancelling orders.
///
/// Cancelling an already cancelled order succeeds without publishing a
/// second `OrderCancelled`.
pub struct CancelOrderHandler {
    orders: Arc<dyn OrderStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: OrderLocks,
}

impl CancelOrderHandler {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: OrderLocks,
    ) -> Self {
        Self {
            orders,
            publisher,
            locks,
        }
    }

    pub async fn handle(&self, cmd: CancelOrderCommand) -> Result<Order, OrderError> {
        let _guard = self.locks.lock(cmd.order_id).await;
        let outcome = self.orders.cancel_order(cmd.order_id).await?;

        if outcome.changed() {
            let sequence = self
                .publisher
                .publish(DomainEvent::OrderCancelled(OrderCancelledPayload::new(
                    outcome.order(),
                )));
            tracing::info!(order_id = %cmd.order_id, sequence, "order cancelled");
        } else {
            tracing::debug!(order_id = %cmd.order_id, "order already cancelled");
        }

        Ok(outcome.order().clone())
    }
}
