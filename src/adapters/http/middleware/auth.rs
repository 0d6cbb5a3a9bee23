//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves the caller's token into an
//!   [`AuthScope`] and injects it into request extensions
//! - `RequireScope` - Extractor that reads the injected scope
//!
//! # Architecture
//!
//! The middleware uses the `ScopeResolver` port, so handlers and the
//! realtime adapters only ever see the resolved scope.
//!
//! ```text
//! Request → auth_middleware → injects AuthScope into extensions
//!                                      ↓
//!                   Handler → RequireScope / Extension<AuthScope>
//! ```
//!
//! # Token Extraction
//!
//! Checked in order:
//! 1. `x-auth-token: <token>`
//! 2. `Authorization: Bearer <token>`
//! 3. `?token=<token>` (browser WebSocket and EventSource clients cannot set headers)

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthScope, ErrorCode};
use crate::ports::ScopeResolver;

use crate::adapters::http::error::ErrorResponse;

/// Auth middleware state - wraps the scope resolver.
pub type AuthState = Arc<dyn ScopeResolver>;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Deserialize)]
struct TokenParam {
    token: Option<String>,
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers.get(AUTH_TOKEN_HEADER).and_then(|h| h.to_str().ok()) {
        return Some(token.trim().to_string());
    }
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

fn extract_token(request: &Request) -> Option<String> {
    token_from_headers(request.headers()).or_else(|| {
        Query::<TokenParam>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(param)| param.token)
    })
}

/// Authentication middleware.
///
/// Every route behind this layer requires a resolvable token; there is no
/// anonymous access to orders, the catalog or the event streams.
pub async fn auth_middleware(
    State(resolver): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request) else {
        return AuthRejection::from(AuthError::MissingCredentials).into_response();
    };

    match resolver.resolve(&token).await {
        Ok(scope) => {
            tracing::trace!(role = ?scope.role, station_id = ?scope.station_id, "request authorized");
            request.extensions_mut().insert(scope);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "token rejected");
            AuthRejection::from(e).into_response()
        }
    }
}

/// Extractor for the scope injected by [`auth_middleware`].
///
/// ```ignore
/// async fn my_handler(RequireScope(scope): RequireScope) -> impl IntoResponse {
///     format!("{:?}", scope.role)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireScope(pub AuthScope);

#[async_trait]
impl<S> FromRequestParts<S> for RequireScope
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthScope>()
            .copied()
            .map(RequireScope)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection returned when authentication fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No usable credential was presented.
    Unauthenticated,
    /// A credential was presented but did not resolve.
    InvalidToken,
    /// The caller is known but may not do this.
    Forbidden,
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => AuthRejection::Unauthenticated,
            AuthError::InvalidToken => AuthRejection::InvalidToken,
            AuthError::InsufficientPermissions => AuthRejection::Forbidden,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentication required",
            ),
            AuthRejection::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Invalid token",
            ),
            AuthRejection::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorCode::Forbidden,
                "Insufficient permissions",
            ),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::TokenScopeResolver;
    use crate::domain::foundation::{StationId, UserId};
    use crate::domain::staff::User;
    use axum::{body::Body, middleware, routing::get, Router};
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn app() -> Router {
        let resolver: AuthState = Arc::new(
            TokenScopeResolver::new(Some(SecretString::new("admin-secret".to_string())))
                .with_user("grill", User::new(UserId::new(1), "grill", Some(StationId::new(2)))),
        );

        async fn whoami(RequireScope(scope): RequireScope) -> String {
            format!("{:?}:{:?}", scope.role, scope.station_id.map(|s| s.value()))
        }

        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(resolver, auth_middleware))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let response = app()
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTH_TOKEN_HEADER, "nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn header_token_resolves_station_scope() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTH_TOKEN_HEADER, "grill")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Station:Some(2)");
    }

    #[tokio::test]
    async fn bearer_and_query_tokens_are_accepted() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", "Bearer admin-secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "Admin:None");

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami?token=grill")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn auth_errors_map_to_rejections() {
        assert_eq!(
            AuthRejection::from(AuthError::InsufficientPermissions),
            AuthRejection::Forbidden
        );
        assert_eq!(
            AuthRejection::from(AuthError::InvalidToken).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
