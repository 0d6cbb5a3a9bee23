//! DTOs for order endpoints.

use serde::Serialize;

use crate::domain::foundation::{OrderId, OrderLineId, ProductId};
use crate::domain::order::{AggregateStatus, FulfillmentStatus, Order, OrderStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub line_id: OrderLineId,
    pub product_id: ProductId,
    pub status: FulfillmentStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub status: OrderStatus,
    pub aggregate_status: AggregateStatus,
    pub cancelled: bool,
    pub lines: Vec<OrderLineResponse>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            created_at: order.created_at().as_millis(),
            status: order.status(),
            aggregate_status: order.aggregate_status(),
            cancelled: order.is_cancelled(),
            lines: order
                .lines()
                .iter()
                .map(|line| OrderLineResponse {
                    line_id: line.id,
                    product_id: line.product_id,
                    status: line.status,
                })
                .collect(),
        }
    }
}
