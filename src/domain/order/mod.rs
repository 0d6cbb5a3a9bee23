//! Order module - orders, order lines and the fulfillment state machine.

mod errors;
#[allow(clippy::module_inception)]
mod order;
mod status;

pub use errors::OrderError;
pub use order::{
    Order, OrderLine, OrderRequest, OrderRequestLine, MAX_LINE_QUANTITY, MAX_ORDER_LINES,
};
pub use status::{AggregateStatus, FulfillmentStatus, OrderStatus};
