//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Status the response layer pairs with this code.
    ///
    /// Anything not mapped below answers 400: validation, cart and
    /// signature failures are all client mistakes. `DuplicateEmail` is a
    /// 400 rather than a 409 because the storefront treats it as a form
    /// validation failure.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::OrderNotFound | Self::BookNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::IncorrectOldPassword => StatusCode::UNAUTHORIZED,

            Self::GatewayError | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::Success, StatusCode::OK),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::OrderNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::BookNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::AlreadyExists, StatusCode::CONFLICT),
            (ErrorCode::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (ErrorCode::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ErrorCode::TokenExpired, StatusCode::UNAUTHORIZED),
            (ErrorCode::TokenInvalid, StatusCode::UNAUTHORIZED),
            (ErrorCode::IncorrectOldPassword, StatusCode::UNAUTHORIZED),
            (ErrorCode::GatewayError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(code.http_status(), status, "{code:?}");
        }
    }

    #[test]
    fn test_client_mistakes_answer_400() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidRequest,
            ErrorCode::DuplicateEmail,
            ErrorCode::EmptyCart,
            ErrorCode::InvalidSignature,
            ErrorCode::Unknown,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST, "{code:?}");
        }
    }
}
