//! HTTP middleware for axum.
//!
//! - `auth` - Token → scope middleware and extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireScope, AUTH_TOKEN_HEADER};
