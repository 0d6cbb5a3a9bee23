//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authorization scope, the state machine
//! trait and error types that form the vocabulary of the POS domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthScope, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{OrderId, OrderLineId, ProductId, ProductTypeId, StationId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
