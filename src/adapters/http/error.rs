//! Error responses shared by the HTTP adapters.

use std::str::FromStr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::ErrorCode;
use crate::domain::order::OrderError;

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        c if c.is_not_found() => StatusCode::NOT_FOUND,
        ErrorCode::Conflict | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::InvalidArgument | ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    let status = status_for(code);
    let body = ErrorResponse::new(code, message);
    if status.is_server_error() {
        tracing::error!(code = %body.code, message = %body.message, "request failed");
    }
    (status, Json(body)).into_response()
}

/// Parses a path segment into a typed id, or a 400 response.
pub fn parse_id<T: FromStr>(what: &str, raw: &str) -> Result<T, Response> {
    raw.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid {} id: {}", what, raw))),
        )
            .into_response()
    })
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        error_response(self.code(), self.message())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        error_response(self.code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, ProductId};

    #[test]
    fn not_found_family_maps_to_404() {
        for code in [
            ErrorCode::OrderNotFound,
            ErrorCode::OrderLineNotFound,
            ErrorCode::ProductNotFound,
            ErrorCode::StationNotFound,
        ] {
            assert_eq!(status_for(code), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn duplicate_fulfillment_maps_to_409() {
        let err = OrderError::already_fulfilled(OrderId::new(1), ProductId::new(2));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn forbidden_catalog_edit_maps_to_403() {
        assert_eq!(
            CatalogError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_id::<OrderId>("order", "abc").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_id::<OrderId>("order", "12").unwrap(), OrderId::new(12));
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let err = OrderError::infrastructure("pool closed");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
