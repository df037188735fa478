//! API Response types
//!
//! Standardized response envelopes for the entire platform.
//! All endpoints reply with one of two shapes:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "code": 6001, "message": "Book not found" }
//! ```
//!
//! Paginated listings add `page`/`limit`/`total`/`totalPages` at the top level.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Unified response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `true` on success, `false` on failure
    pub success: bool,
    /// Error code (present on failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message (errors and informational successes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: None,
            message: None,
            data: Some(data),
        }
    }

    /// Create a successful response with data and a message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: None,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: None,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            code: Some(err.code.code()),
            message: Some(err.message.clone()),
            data: None,
        }
    }
}

/// Paginated response envelope (catalog listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub success: bool,
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of matching items
    pub total: u64,
    /// Total number of pages
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    /// Items on this page
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            success: true,
            page,
            limit,
            total,
            total_pages,
            data,
        }
    }
}
