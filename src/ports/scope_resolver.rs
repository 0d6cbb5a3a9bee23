//! Scope resolution port.
//!
//! Turns a presented credential into the [`AuthScope`] the core works with.
//! The core never inspects credentials itself; HTTP middleware calls this
//! port and hands the resulting scope on.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthScope};

#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// Resolve a raw token (without any `Bearer ` prefix).
    ///
    /// # Returns
    ///
    /// * `Ok(AuthScope)` - token is known
    /// * `Err(AuthError::InvalidToken)` - token is unknown
    async fn resolve(&self, token: &str) -> Result<AuthScope, AuthError>;
}
