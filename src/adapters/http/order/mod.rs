//! HTTP adapter for orders.

mod dto;
mod handlers;
mod routes;

pub use dto::{OrderLineResponse, OrderResponse};
pub use handlers::OrderHandlers;
pub use routes::order_routes;
