//! CreateOrderHandler - Command handler for placing orders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::events::{DomainEvent, OrderCreatedPayload};
use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::order::{Order, OrderError, OrderRequest};
use crate::application::handlers::ProductLocks;
use crate::ports::{CatalogStore, EventPublisher, OrderStore};

/// Command to place an order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub request: OrderRequest,
}

/// Handler for placing orders.
///
/// Every requested product must exist and be orderable at the moment the
/// order is placed. The order and all of its lines are written as one unit;
/// `OrderCreated` follows only once that write has succeeded.
///
/// The product locks are shared with the catalog handlers and held from the
/// availability check until the order is published.
pub struct CreateOrderHandler {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: ProductLocks,
}

impl CreateOrderHandler {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: ProductLocks,
    ) -> Self {
        Self {
            catalog,
            orders,
            publisher,
            locks,
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<Order, OrderError> {
        // 1. Expand quantities into one line per unit
        let lines = cmd.request.expand()?;

        // 2. Resolve products
        let wanted: Vec<ProductId> = cmd.request.product_ids().into_iter().collect();
        let _guards = self.locks.lock_all(wanted.iter().copied()).await;
        let products: HashMap<ProductId, _> = self
            .catalog
            .find_products(&wanted)
            .await?
            .into_iter()
            .map(|p| (p.id(), p))
            .collect();

        for id in &wanted {
            let product = products
                .get(id)
                .ok_or_else(|| OrderError::product_not_found(*id))?;
            if product.is_discontinued() {
                return Err(OrderError::invalid_argument(format!(
                    "Product {} is discontinued",
                    id
                )));
            }
            if product.is_sold_out() {
                return Err(OrderError::invalid_argument(format!(
                    "Product {} is sold out",
                    id
                )));
            }
        }

        // 3. Persist order and lines together
        let order = self.orders.insert_order(Timestamp::now(), &lines).await?;

        // 4. Publish the fully materialized order
        let sequence = self
            .publisher
            .publish(DomainEvent::OrderCreated(OrderCreatedPayload::new(&order, &products)));
        tracing::info!(
            order_id = %order.id(),
            lines = order.lines().len(),
            sequence,
            "order created"
        );

        Ok(order)
    }
}
