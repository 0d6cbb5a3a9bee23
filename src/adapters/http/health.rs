//! Health route. Public, outside the auth layer.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::realtime::SubscriberManager;

#[derive(Clone)]
pub struct HealthState {
    pub bus: Arc<InMemoryEventBus>,
    pub manager: Arc<SubscriberManager>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    subscribers: usize,
    bus_subscriptions: usize,
    last_sequence: u64,
}

pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        subscribers: state.manager.subscriber_count(),
        bus_subscriptions: state.bus.subscription_count(),
        last_sequence: state.bus.last_sequence(),
    })
}

pub fn health_routes(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
