//! HTTP adapters - REST and realtime endpoints.
//!
//! ```text
//! /health                      public
//! /api/products, /api/stations ┐
//! /api/orders                  ├─ auth_middleware, request timeout
//! /api/events/ws, /api/events/stream ─ auth_middleware only
//! ```

pub mod catalog;
pub mod error;
pub mod health;
pub mod middleware;
pub mod order;

use std::time::Duration;

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::adapters::realtime::{realtime_router, RealtimeState};

pub use catalog::{catalog_routes, CatalogHandlers};
pub use error::{error_response, status_for, ErrorResponse};
pub use health::{health_routes, HealthState};
pub use middleware::{auth_middleware, AuthState, RequireScope};
pub use order::{order_routes, OrderHandlers};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct ApiState {
    pub auth: AuthState,
    pub catalog: CatalogHandlers,
    pub orders: OrderHandlers,
    pub realtime: RealtimeState,
    pub health: HealthState,
}

/// Builds the full application router.
///
/// The request timeout is applied to the REST routes only; event streams
/// are long-lived by nature.
pub fn build_app(state: ApiState, request_timeout: Duration) -> Router {
    let rest = Router::new()
        .merge(catalog_routes(state.catalog))
        .merge(order_routes(state.orders))
        .layer(TimeoutLayer::new(request_timeout));

    let streams = realtime_router().with_state(state.realtime);

    let protected = Router::new()
        .merge(rest)
        .merge(streams)
        .layer(axum::middleware::from_fn_with_state(
            state.auth,
            auth_middleware,
        ));

    Router::new()
        .merge(health_routes(state.health))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
}
