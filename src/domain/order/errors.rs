//! Order-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ProductId, ValidationError};

/// Order errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Referenced order, line or product does not exist.
    NotFound { code: ErrorCode, message: String },
    /// The requested transition is not possible from the current state.
    Conflict(String),
    /// The request itself is malformed.
    InvalidArgument(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl OrderError {
    pub fn order_not_found(id: OrderId) -> Self {
        OrderError::NotFound {
            code: ErrorCode::OrderNotFound,
            message: format!("Order not found: {}", id),
        }
    }

    pub fn line_not_found(order_id: OrderId, product_id: ProductId) -> Self {
        OrderError::NotFound {
            code: ErrorCode::OrderLineNotFound,
            message: format!("Order {} has no line for product {}", order_id, product_id),
        }
    }

    pub fn product_not_found(id: ProductId) -> Self {
        OrderError::NotFound {
            code: ErrorCode::ProductNotFound,
            message: format!("Product not found: {}", id),
        }
    }

    pub fn already_fulfilled(order_id: OrderId, product_id: ProductId) -> Self {
        OrderError::Conflict(format!(
            "Product {} on order {} is already fulfilled",
            product_id, order_id
        ))
    }

    pub fn cancelled(order_id: OrderId) -> Self {
        OrderError::Conflict(format!("Order {} is cancelled", order_id))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        OrderError::InvalidArgument(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        OrderError::Infrastructure(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrderError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, OrderError::Conflict(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::NotFound { code, .. } => *code,
            OrderError::Conflict(_) => ErrorCode::Conflict,
            OrderError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            OrderError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            OrderError::NotFound { message, .. } => message.clone(),
            OrderError::Conflict(msg) => msg.clone(),
            OrderError::InvalidArgument(msg) => format!("Invalid argument: {}", msg),
            OrderError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OrderError {}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_not_found() => OrderError::NotFound {
                code,
                message: err.message,
            },
            ErrorCode::Conflict | ErrorCode::InvalidStateTransition => {
                OrderError::Conflict(err.message)
            }
            ErrorCode::InvalidArgument | ErrorCode::ValidationFailed => {
                OrderError::InvalidArgument(err.message)
            }
            _ => OrderError::Infrastructure(err.to_string()),
        }
    }
}

impl From<OrderError> for DomainError {
    fn from(err: OrderError) -> Self {
        let code = err.code();
        let message = match err {
            OrderError::NotFound { message, .. }
            | OrderError::Conflict(message)
            | OrderError::InvalidArgument(message)
            | OrderError::Infrastructure(message) => message,
        };
        DomainError::new(code, message)
    }
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::from(DomainError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_survives_store_roundtrip() {
        let original = OrderError::already_fulfilled(OrderId::new(1), ProductId::new(2));
        let through_store: OrderError = DomainError::from(original.clone()).into();
        assert_eq!(through_store, original);
    }

    #[test]
    fn line_not_found_keeps_its_code() {
        let err = OrderError::line_not_found(OrderId::new(1), ProductId::new(9));
        assert!(err.is_not_found());
        assert_eq!(err.code(), ErrorCode::OrderLineNotFound);
        let back: OrderError = DomainError::from(err.clone()).into();
        assert_eq!(back.code(), ErrorCode::OrderLineNotFound);
    }

    #[test]
    fn rejected_transition_is_a_conflict() {
        let err: OrderError = ValidationError::invalid_transition("Fulfilled", "Fulfilled").into();
        assert!(err.is_conflict());
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: OrderError = DomainError::new(ErrorCode::DatabaseError, "down").into();
        assert!(matches!(err, OrderError::Infrastructure(_)));
    }
}
