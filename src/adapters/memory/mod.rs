//! In-memory store adapters.

mod catalog_store;
mod order_store;

pub use catalog_store::InMemoryCatalogStore;
pub use order_store::InMemoryOrderStore;
