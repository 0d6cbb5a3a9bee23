//! Order handlers.
//!
//! Each command handler writes through the `OrderStore` first and publishes
//! its event only after the write has committed.

mod announce_order;
mod cancel_order;
mod create_order;
mod mark_fulfilled;

pub use announce_order::{AnnounceOrderCommand, AnnounceOrderHandler, GetOrderHandler, GetOrderQuery};
pub use cancel_order::{CancelOrderCommand, CancelOrderHandler};
pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use mark_fulfilled::{MarkFulfilledCommand, MarkFulfilledHandler, MarkFulfilledResult};
