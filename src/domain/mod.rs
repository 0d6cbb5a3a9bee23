//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, scope, errors)
//! - `catalog` - Products, product types and stations
//! - `order` - Orders and the per-line fulfillment state machine
//! - `staff` - Staff accounts and the scope they map to
//! - `events` - Events distributed to live connections
//! - `routing` - Audience resolution from station assignments

pub mod catalog;
pub mod events;
pub mod foundation;
pub mod order;
pub mod routing;
pub mod staff;
