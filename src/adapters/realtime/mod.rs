//! Realtime delivery to connected staff devices.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  publish   ┌──────────────────┐  offer   ┌─────────────┐
//! │ Command        │ ─────────▶ │ InMemoryEventBus │ ───────▶ │ EventQueue  │ (one per connection)
//! │ handlers       │            │ (audience filter)│          └──────┬──────┘
//! └────────────────┘            └──────────────────┘                 │ recv
//!                                                      ┌─────────────┴─────────────┐
//!                                                      ▼                           ▼
//!                                               WebSocket task                SSE task
//! ```
//!
//! - `queue` - bounded drop-oldest queue implementing `EventSink`
//! - `manager` - registers connections with the bus and tears them down
//! - `messages` - frames shared by both transports
//! - `websocket` / `sse` - the two transports

mod manager;
mod messages;
mod queue;
mod sse;
mod websocket;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::order::AnnounceOrderHandler;

pub use manager::{SubscriberHandle, SubscriberId, SubscriberManager};
pub use messages::{ClientMessage, ConnectedMessage, ErrorMessage, EventFrame, PongMessage, ServerMessage};
pub use queue::{EventQueue, QueueSettings};
pub use sse::sse_handler;
pub use websocket::ws_handler;

/// Timing shared by both transports.
#[derive(Debug, Clone, Copy)]
pub struct TransportSettings {
    /// Idle interval after which the SSE stream emits a keep-alive comment.
    pub keep_alive: Duration,
    /// A single push making no progress for this long is a dead connection.
    pub push_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(20),
            push_timeout: Duration::from_secs(10),
        }
    }
}

/// State for the realtime routes.
#[derive(Clone)]
pub struct RealtimeState {
    pub manager: Arc<SubscriberManager>,
    pub announcer: Arc<AnnounceOrderHandler>,
    pub settings: TransportSettings,
}

impl RealtimeState {
    pub fn new(
        manager: Arc<SubscriberManager>,
        announcer: Arc<AnnounceOrderHandler>,
        settings: TransportSettings,
    ) -> Self {
        Self {
            manager,
            announcer,
            settings,
        }
    }
}

/// Routes for both transports. Must be mounted behind the auth middleware,
/// which supplies the caller's `AuthScope`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", realtime_router().with_state(realtime_state))
///     .layer(middleware::from_fn_with_state(resolver, auth_middleware));
/// ```
pub fn realtime_router() -> axum::Router<RealtimeState> {
    use axum::routing::get;

    axum::Router::new()
        .route("/events/ws", get(ws_handler))
        .route("/events/stream", get(sse_handler))
}
