//! Payload shapes, one per event kind.
//!
//! Payloads are fully materialized when the event is built, so consumers
//! never need a follow-up read. Order payloads additionally carry the set of
//! products on the order; it drives audience routing and is not part of the
//! wire form.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::catalog::Product;
use crate::domain::foundation::{OrderId, OrderLineId, ProductId, ProductTypeId};
use crate::domain::order::{AggregateStatus, Order};

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

/// Full product state, sent on creation and on every update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub type_id: ProductTypeId,
    pub discontinued: bool,
    pub sold_out: bool,
}

impl From<&Product> for ProductPayload {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            price: product.price(),
            type_id: product.type_id(),
            discontinued: product.is_discontinued(),
            sold_out: product.is_sold_out(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscontinuedPayload {
    pub id: ProductId,
}

// ════════════════════════════════════════════════════════════════════════════
// OrderCreated
// ════════════════════════════════════════════════════════════════════════════

/// Product details resolved at order time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProduct {
    pub name: String,
    pub price: f64,
    pub type_id: ProductTypeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub line_id: OrderLineId,
    pub product_id: ProductId,
    pub fulfilled: bool,
    /// Absent only if the product could not be resolved when the event was built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<LineProduct>,
}

/// The whole order as placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedPayload {
    pub id: OrderId,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub aggregate_status: AggregateStatus,
    pub lines: Vec<OrderLinePayload>,
    #[serde(skip)]
    pub products: BTreeSet<ProductId>,
}

impl OrderCreatedPayload {
    pub fn new(order: &Order, products: &HashMap<ProductId, Product>) -> Self {
        let lines = order
            .lines()
            .iter()
            .map(|line| OrderLinePayload {
                line_id: line.id,
                product_id: line.product_id,
                fulfilled: line.status.is_fulfilled(),
                product: products.get(&line.product_id).map(|p| LineProduct {
                    name: p.name().to_string(),
                    price: p.price(),
                    type_id: p.type_id(),
                }),
            })
            .collect();

        Self {
            id: order.id(),
            created_at: order.created_at().as_millis(),
            aggregate_status: order.aggregate_status(),
            lines,
            products: order.product_ids(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Order progress
// ════════════════════════════════════════════════════════════════════════════

/// Current aggregate of an order, announced without a state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdatedPayload {
    pub id: OrderId,
    pub aggregate_status: AggregateStatus,
    pub cancelled: bool,
    #[serde(skip)]
    pub products: BTreeSet<ProductId>,
}

impl OrderUpdatedPayload {
    pub fn new(order: &Order) -> Self {
        Self {
            id: order.id(),
            aggregate_status: order.aggregate_status(),
            cancelled: order.is_cancelled(),
            products: order.product_ids(),
        }
    }
}

/// A product on an order was marked fulfilled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductFulfilledPayload {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub aggregate_status: AggregateStatus,
    #[serde(skip)]
    pub products: BTreeSet<ProductId>,
}

impl OrderProductFulfilledPayload {
    /// Built from the order as re-read after the transition committed.
    pub fn new(order: &Order, product_id: ProductId) -> Self {
        Self {
            order_id: order.id(),
            product_id,
            aggregate_status: order.aggregate_status(),
            products: order.product_ids(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelledPayload {
    pub order_id: OrderId,
    #[serde(skip)]
    pub products: BTreeSet<ProductId>,
}

impl OrderCancelledPayload {
    pub fn new(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            products: order.product_ids(),
        }
    }
}
