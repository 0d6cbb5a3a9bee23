//! HTTP routes for order endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{cancel_order, create_order, get_order, mark_fulfilled, OrderHandlers};

/// Creates the order router. Mounted under `/api`.
pub fn order_routes(handlers: OrderHandlers) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order).delete(cancel_order))
        .route("/orders/:id/products/:product_id/fulfilled", put(mark_fulfilled))
        .with_state(handlers)
}
