//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresCatalogStore` - products, product types, stations, assignments
//! - `PostgresOrderStore` - orders and the row-locked fulfillment transition
//!
//! Schema lives in `migrations/` and is applied at startup.

mod catalog_store;
mod order_store;

pub use catalog_store::PostgresCatalogStore;
pub use order_store::PostgresOrderStore;
