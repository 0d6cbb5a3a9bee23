//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Publish domain events (synchronous, never fails)
//! - `EventSubscriber` - Register filtered sinks for published events
//! - `EventSink` - Non-blocking receiving end of a subscription
//!
//! ## Store Ports
//!
//! - `CatalogStore` - Products, product types, stations, assignments
//! - `OrderStore` - Orders and the atomic fulfillment transition
//!
//! ## Auth Ports
//!
//! - `ScopeResolver` - Credential → `AuthScope`

mod catalog_store;
mod event_publisher;
mod event_subscriber;
mod order_store;
mod scope_resolver;

pub use catalog_store::CatalogStore;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventFilter, EventSink, EventSubscriber, Offer, SubscriptionId};
pub use order_store::{CancelOutcome, OrderStore};
pub use scope_resolver::ScopeResolver;
