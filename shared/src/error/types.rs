//! The `AppError` type and its axum integration

use super::codes::ErrorCode;
use http::StatusCode;
use thiserror::Error;

/// A failed operation, ready to be answered to the client.
///
/// Pairs an [`ErrorCode`] with the message the storefront will display.
/// Most call sites use [`AppError::new`] and get the code's default
/// message; endpoints with wording of their own use
/// [`AppError::with_message`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Rejected input, phrased for the client
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `"{resource} not found"` under the generic not-found code
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// Login failure; deliberately the same for unknown email and wrong password
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Server-side fault worth a custom message in the logs
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = crate::response::ApiResponse::error(&self);

        // Client mistakes stay quiet; faults in our own plumbing get logged
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::EmptyCart);
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(err.message, "Cart is empty");
    }

    #[test]
    fn test_with_message_overrides_default() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order not found or not yours");
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found or not yours");
        assert_eq!(format!("{err}"), "Order not found or not yours");
    }

    #[test]
    fn test_status_follows_code() {
        assert_eq!(
            AppError::new(ErrorCode::BookNotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_credentials().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::validation("bad input").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_names_the_resource() {
        let err = AppError::not_found("User");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "User not found");
    }
}
