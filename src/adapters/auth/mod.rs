//! Authentication adapters.
//!
//! - `token` - pre-shared token → `AuthScope` resolver

mod token;

pub use token::TokenScopeResolver;
