//! MarkFulfilledHandler - Command handler for the line fulfillment transition.
//!
//! The store performs the transition as one atomic conditional update scoped
//! to the order and hands back the order as committed. The aggregate status
//! in the event is computed from that full line set, so two stations
//! finishing sibling lines at the same time both see a consistent result and
//! exactly one of them reports `Complete`.
//!
//! The order's lock is held from the store call through the publish, so the
//! sequence numbers of an order's events follow the order of its commits.

use std::sync::Arc;

use crate::domain::events::{DomainEvent, OrderProductFulfilledPayload};
use crate::domain::foundation::{OrderId, ProductId};
use crate::domain::order::{AggregateStatus, Order, OrderError};
use crate::application::handlers::OrderLocks;
use crate::ports::{EventPublisher, OrderStore};

#[derive(Debug, Clone, Copy)]
pub struct MarkFulfilledCommand {
    pub order_id: OrderId,
    pub product_id: ProductId,
}

#[derive(Debug, Clone)]
pub struct MarkFulfilledResult {
    pub order: Order,
    pub aggregate_status: AggregateStatus,
    pub sequence: u64,
}

pub struct MarkFulfilledHandler {
    orders: Arc<dyn OrderStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: OrderLocks,
}

impl MarkFulfilledHandler {
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

    pub async fn handle(&self, cmd: MarkFulfilledCommand) -> Result<MarkFulfilledResult, OrderError> {
        let _guard = self.locks.lock(cmd.order_id).await;
        let order = self
            .orders
            .fulfill_product(cmd.order_id, cmd.product_id)
            .await
            .map_err(|e| {
                let err = OrderError::from(e);
                if err.is_conflict() {
                    tracing::debug!(
                        order_id = %cmd.order_id,
                        product_id = %cmd.product_id,
                        "duplicate fulfillment rejected"
                    );
                }
                err
            })?;

        let payload = OrderProductFulfilledPayload::new(&order, cmd.product_id);
        let aggregate_status = payload.aggregate_status;
        let sequence = self
            .publisher
            .publish(DomainEvent::OrderProductFulfilled(payload));

        tracing::info!(
            order_id = %cmd.order_id,
            product_id = %cmd.product_id,
            aggregate_status = ?aggregate_status,
            sequence,
            "order product fulfilled"
        );

        Ok(MarkFulfilledResult {
            order,
            aggregate_status,
            sequence,
        })
    }
}
