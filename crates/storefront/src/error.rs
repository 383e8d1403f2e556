//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Validation and auth errors fire before any side effect; persistence errors
//! are terminal for the current submission (the user retries manually);
//! notification failures never reach this type at all - they are logged and
//! swallowed inside the dispatch task.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::razorpay::RazorpayError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, rejected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A cart or checkout operation without a signed-in user.
    #[error("Authentication required")]
    AuthRequired,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// The database's access rules rejected the write. Operator
    /// misconfiguration, not a user error, so it gets its own message.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Payment gateway operation failed.
    #[error("Payment error: {0}")]
    Payment(RazorpayError),

    /// The payment gateway is not configured or unreachable; submission is
    /// blocked up front. Distinct from a user cancelling payment.
    #[error("Payment gateway unavailable")]
    PaymentUnavailable,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::PermissionDenied(_) => Self::PermissionDenied(e.to_string()),
            RepositoryError::NotFound => Self::NotFound("resource".to_owned()),
            _ => Self::Database(e),
        }
    }
}

impl From<RazorpayError> for AppError {
    fn from(e: RazorpayError) -> Self {
        match e {
            RazorpayError::NotConfigured => Self::PaymentUnavailable,
            _ => Self::Payment(e),
        }
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Payment(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PaymentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(msg) => msg.clone(),
            Self::AuthRequired => {
                "You must be logged in to do that. Please log in and try again.".to_owned()
            }
            Self::PermissionDenied(_) => {
                "The order could not be saved because database access rules rejected it. \
                 Please ask the store operator to check the access-control configuration."
                    .to_owned()
            }
            Self::NotFound(what) => format!("{what} not found"),
            Self::PaymentUnavailable => {
                "Online payment is currently unavailable. Please try again later or choose \
                 cash on delivery."
                    .to_owned()
            }
            Self::Payment(_) => "Payment service error. You have not been charged.".to_owned(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product prod_9".to_string());
        assert_eq!(err.to_string(), "Not found: product prod_9");

        let err = AppError::Validation("first_name is required".to_string());
        assert_eq!(err.to_string(), "Validation error: first_name is required");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::AuthRequired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::PaymentUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_permission_denied_is_distinct_from_generic_failure() {
        let permission = AppError::PermissionDenied("insufficient_privilege".to_string());
        let response = permission.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
