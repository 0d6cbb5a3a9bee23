//! Order aggregate.
//!
//! An order owns its lines. Each line is one unit of one product and moves
//! through [`FulfillmentStatus`] on its own; the order's aggregate status is
//! recomputed from the lines on every read and never stored.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::domain::foundation::{
    OrderId, OrderLineId, ProductId, StateMachine, Timestamp, ValidationError,
};

use super::{AggregateStatus, FulfillmentStatus, OrderError, OrderStatus};

/// One unit of one product on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    pub status: FulfillmentStatus,
}

impl OrderLine {
    pub fn pending(id: OrderLineId, product_id: ProductId) -> Self {
        Self {
            id,
            product_id,
            status: FulfillmentStatus::Pending,
        }
    }

    fn fulfill(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(FulfillmentStatus::Fulfilled)?;
        Ok(())
    }
}

/// Order aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    created_at: Timestamp,
    cancelled: bool,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Rebuilds an order from stored fields.
    ///
    /// Stores must never persist an order without lines; an empty line set
    /// is rejected here so a corrupt record cannot masquerade as valid.
    pub fn reconstitute(
        id: OrderId,
        created_at: Timestamp,
        cancelled: bool,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::infrastructure(format!(
                "Order {} has no lines",
                id
            )));
        }
        Ok(Self {
            id,
            created_at,
            cancelled,
            lines,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Distinct products on the order, used for audience routing.
    pub fn product_ids(&self) -> BTreeSet<ProductId> {
        self.lines.iter().map(|l| l.product_id).collect()
    }

    /// `Complete` iff every line is fulfilled, computed from the full line set.
    pub fn aggregate_status(&self) -> AggregateStatus {
        AggregateStatus::from_lines(self.lines.iter().map(|l| l.status))
    }

    /// Display status; cancellation supersedes the aggregate.
    pub fn status(&self) -> OrderStatus {
        if self.cancelled {
            OrderStatus::Cancelled
        } else {
            self.aggregate_status().into()
        }
    }

    /// Marks every pending line of `product_id` fulfilled.
    ///
    /// Returns the number of lines transitioned. Fails with `NotFound` if
    /// the order has no line for the product and with `Conflict` if the
    /// order is cancelled or every such line is already fulfilled.
    pub fn fulfill_product(&mut self, product_id: ProductId) -> Result<usize, OrderError> {
        if !self.lines.iter().any(|l| l.product_id == product_id) {
            return Err(OrderError::line_not_found(self.id, product_id));
        }
        if self.cancelled {
            return Err(OrderError::cancelled(self.id));
        }

        let mut fulfilled = 0;
        for line in self
            .lines
            .iter_mut()
            .filter(|l| l.product_id == product_id && !l.status.is_fulfilled())
        {
            line.fulfill()?;
            fulfilled += 1;
        }

        if fulfilled == 0 {
            return Err(OrderError::already_fulfilled(self.id, product_id));
        }
        Ok(fulfilled)
    }

    /// Cancels the order. Returns false when it was already cancelled.
    ///
    /// Line statuses are left untouched.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        true
    }
}

/// Most units of one product a single request line may ask for.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Most order lines one order may expand to.
pub const MAX_ORDER_LINES: usize = 500;

/// One requested product and how many units of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestLine {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Input for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRequest {
    pub lines: Vec<OrderRequestLine>,
}

impl OrderRequest {
    /// Expands quantities into one product id per order line, in request order.
    ///
    /// Quantities are bounded by [`MAX_LINE_QUANTITY`] and the expanded order
    /// by [`MAX_ORDER_LINES`]; nothing is allocated for a request past either.
    pub fn expand(&self) -> Result<Vec<ProductId>, OrderError> {
        if self.lines.is_empty() {
            return Err(OrderError::invalid_argument("An order needs at least one line"));
        }

        let mut total = 0usize;
        for line in &self.lines {
            if line.quantity == 0 || line.quantity > MAX_LINE_QUANTITY {
                return Err(OrderError::invalid_argument(format!(
                    "Quantity for product {} must be between 1 and {}",
                    line.product_id, MAX_LINE_QUANTITY
                )));
            }
            total += line.quantity as usize;
            if total > MAX_ORDER_LINES {
                return Err(OrderError::invalid_argument(format!(
                    "An order may have at most {} lines",
                    MAX_ORDER_LINES
                )));
            }
        }

        let mut expanded = Vec::with_capacity(total);
        for line in &self.lines {
            expanded.extend(std::iter::repeat(line.product_id).take(line.quantity as usize));
        }
        Ok(expanded)
    }

    /// Distinct products referenced by the request.
    pub fn product_ids(&self) -> BTreeSet<ProductId> {
        self.lines.iter().map(|l| l.product_id).collect()
    }
}
