//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod catalog;
mod locks;
pub mod order;

pub use locks::{KeyedLocks, OrderLocks, ProductLocks};

#[cfg(test)]
mod testing;
