//! Error codes and the error type shared by server and clients
//!
//! Every failure the API reports is an [`AppError`]: an [`ErrorCode`] plus a
//! display message. Codes are grouped into numeric ranges so clients can
//! branch on the class of failure without matching individual codes:
//!
//! - 0xxx general, 1xxx auth, 4xxx orders, 5xxx payments, 6xxx catalog,
//!   9xxx system
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::BookNotFound);
//! assert_eq!(err.message, "Book not found");
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Missing required fields");
//! assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
