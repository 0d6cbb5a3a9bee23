//! Static token scope resolver.
//!
//! Staff devices present a pre-shared token in the `x-auth-token` header.
//! The configured admin token maps to the admin scope; every other token is
//! looked up in the staff table and mapped through [`User::scope`].
//!
//! # Example
//!
//! ```ignore
//! let resolver = TokenScopeResolver::new(Some(admin_token))
//!     .with_user("grill-tablet", User::new(UserId::new(2), "grill", Some(StationId::new(1))));
//!
//! let scope = resolver.resolve("grill-tablet").await?;
//! assert_eq!(scope, AuthScope::station(StationId::new(1)));
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::domain::foundation::{AuthError, AuthScope};
use crate::domain::staff::User;
use crate::ports::ScopeResolver;

/// Resolves pre-shared tokens to scopes.
#[derive(Debug, Default)]
pub struct TokenScopeResolver {
    admin_token: Option<SecretString>,
    users: RwLock<HashMap<String, User>>,
}

impl TokenScopeResolver {
    pub fn new(admin_token: Option<SecretString>) -> Self {
        Self {
            admin_token,
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a staff token.
    pub fn with_user(self, token: impl Into<String>, user: User) -> Self {
        self.add_user(token, user);
        self
    }

    pub fn add_user(&self, token: impl Into<String>, user: User) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    fn is_admin_token(&self, token: &str) -> bool {
        match &self.admin_token {
            Some(admin) => {
                let expected = admin.expose_secret().as_bytes();
                !expected.is_empty() && bool::from(expected.ct_eq(token.as_bytes()))
            }
            None => false,
        }
    }
}

#[async_trait]
impl ScopeResolver for TokenScopeResolver {
    async fn resolve(&self, token: &str) -> Result<AuthScope, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if self.is_admin_token(token) {
            return Ok(AuthScope::admin());
        }

        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users
            .get(token)
            .map(User::scope)
            .ok_or(AuthError::InvalidToken)
    }
}
