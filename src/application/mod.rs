//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through the stores; events are published afterwards.

pub mod handlers;
