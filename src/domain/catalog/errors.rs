//! Catalog-specific error types.

use crate::domain::foundation::{
    DomainError, ErrorCode, ProductId, ProductTypeId, StationId, ValidationError,
};

/// Catalog errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Referenced product, product type or station does not exist.
    NotFound { code: ErrorCode, message: String },
    /// Caller may not edit the catalog.
    Forbidden,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl CatalogError {
    pub fn product_not_found(id: ProductId) -> Self {
        CatalogError::NotFound {
            code: ErrorCode::ProductNotFound,
            message: format!("Product not found: {}", id),
        }
    }

    pub fn product_type_not_found(id: ProductTypeId) -> Self {
        CatalogError::NotFound {
            code: ErrorCode::ProductTypeNotFound,
            message: format!("Product type not found: {}", id),
        }
    }

    pub fn station_not_found(id: StationId) -> Self {
        CatalogError::NotFound {
            code: ErrorCode::StationNotFound,
            message: format!("Station not found: {}", id),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::NotFound { code, .. } => *code,
            CatalogError::Forbidden => ErrorCode::Forbidden,
            CatalogError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CatalogError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CatalogError::NotFound { message, .. } => message.clone(),
            CatalogError::Forbidden => "Catalog changes require the admin role".to_string(),
            CatalogError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CatalogError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CatalogError {}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_not_found() => CatalogError::NotFound {
                code,
                message: err.message,
            },
            ErrorCode::Forbidden | ErrorCode::Unauthorized => CatalogError::Forbidden,
            ErrorCode::ValidationFailed | ErrorCode::InvalidArgument => {
                CatalogError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => CatalogError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::from(DomainError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_keeps_specific_code() {
        let err: CatalogError =
            DomainError::new(ErrorCode::StationNotFound, "Station not found: 3").into();
        assert_eq!(err.code(), ErrorCode::StationNotFound);
        assert_eq!(err.message(), "Station not found: 3");
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: CatalogError = ValidationError::empty_field("name").into();
        assert!(matches!(err, CatalogError::ValidationFailed { ref field, .. } if field == "name"));
    }

    #[test]
    fn database_failure_is_infrastructure() {
        let err: CatalogError = DomainError::new(ErrorCode::DatabaseError, "boom").into();
        assert!(matches!(err, CatalogError::Infrastructure(_)));
    }
}
