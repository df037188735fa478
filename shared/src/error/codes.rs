//! The numeric error code registry
//!
//! Codes are the stable part of the API contract: the storefront branches on
//! them, messages are allowed to change. Serialization is the bare number
//! (`"code": 6001`), and the ranges follow the platform convention listed in
//! the module docs of [`crate::error`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    /// Registration with an email that already has an account
    DuplicateEmail = 1005,
    /// Password change where the old password does not verify
    IncorrectOldPassword = 1006,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    EmptyCart = 4002,

    // ==================== 5xxx: Payment ====================
    /// The payment provider call failed or answered with an error
    GatewayError = 5001,
    /// Webhook arrived without a valid signature
    InvalidSignature = 5002,

    // ==================== 6xxx: Catalog ====================
    BookNotFound = 6001,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default client-facing message for the code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Invalid or expired token",
            ErrorCode::DuplicateEmail => "Email already registered",
            ErrorCode::IncorrectOldPassword => "Incorrect old password",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::EmptyCart => "Cart is empty",

            ErrorCode::GatewayError => "Payment gateway error",
            ErrorCode::InvalidSignature => "Invalid webhook signature",

            ErrorCode::BookNotFound => "Book not found",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A u16 that is not in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::DuplicateEmail),
            1006 => Ok(ErrorCode::IncorrectOldPassword),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::EmptyCart),

            5001 => Ok(ErrorCode::GatewayError),
            5002 => Ok(ErrorCode::InvalidSignature),

            6001 => Ok(ErrorCode::BookNotFound),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The numeric values are a published contract; a renumbering must fail
    // here before it reaches a client.
    #[test]
    fn test_registry_values_are_stable() {
        let registry = [
            (ErrorCode::Success, 0),
            (ErrorCode::Unknown, 1),
            (ErrorCode::ValidationFailed, 2),
            (ErrorCode::NotFound, 3),
            (ErrorCode::AlreadyExists, 4),
            (ErrorCode::InvalidRequest, 5),
            (ErrorCode::NotAuthenticated, 1001),
            (ErrorCode::InvalidCredentials, 1002),
            (ErrorCode::TokenExpired, 1003),
            (ErrorCode::TokenInvalid, 1004),
            (ErrorCode::DuplicateEmail, 1005),
            (ErrorCode::IncorrectOldPassword, 1006),
            (ErrorCode::OrderNotFound, 4001),
            (ErrorCode::EmptyCart, 4002),
            (ErrorCode::GatewayError, 5001),
            (ErrorCode::InvalidSignature, 5002),
            (ErrorCode::BookNotFound, 6001),
            (ErrorCode::InternalError, 9001),
            (ErrorCode::DatabaseError, 9002),
        ];
        for (code, value) in registry {
            assert_eq!(code.code(), value, "{code:?} renumbered");
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_unregistered_values_are_rejected() {
        for value in [6, 1000, 1007, 2001, 4003, 5003, 6002, 9003, u16::MAX] {
            assert_eq!(ErrorCode::try_from(value), Err(InvalidErrorCode(value)));
        }
    }

    #[test]
    fn test_serde_uses_the_bare_number() {
        let json = serde_json::to_string(&ErrorCode::DuplicateEmail).unwrap();
        assert_eq!(json, "1005");

        let code: ErrorCode = serde_json::from_str("6001").unwrap();
        assert_eq!(code, ErrorCode::BookNotFound);

        assert!(serde_json::from_str::<ErrorCode>("8888").is_err());
    }

    #[test]
    fn test_display_prints_the_number() {
        assert_eq!(ErrorCode::GatewayError.to_string(), "5001");
    }

    #[test]
    fn test_every_code_has_a_message() {
        for value in [0u16, 1, 2, 3, 4, 5, 1001, 1002, 1003, 1004, 1005, 1006] {
            let code = ErrorCode::try_from(value).unwrap();
            assert!(!code.message().is_empty());
        }
    }
}
