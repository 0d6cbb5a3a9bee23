//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token → scope resolution
//! - `events` - The in-process event bus
//! - `realtime` - Subscriber queues and the WebSocket/SSE transports
//! - `memory` / `postgres` - Store implementations
//! - `http` - axum routes and middleware

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod realtime;

pub use auth::TokenScopeResolver;
pub use events::InMemoryEventBus;
pub use memory::{InMemoryCatalogStore, InMemoryOrderStore};
pub use postgres::{PostgresCatalogStore, PostgresOrderStore};
pub use realtime::{SubscriberManager, TransportSettings};
