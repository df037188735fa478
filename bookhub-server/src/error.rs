//! Handler-level error type
//!
//! Storage functions return boxed errors while business failures are
//! `AppError`s with a concrete `ErrorCode`. `ServiceError` accepts both, so
//! a handler body can use `?` on either kind and the response mapping lives
//! in one place.

use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Either a storage fault or a business-rule failure.
///
/// Storage faults are logged at response time and answered as an opaque
/// `DatabaseError`; business failures keep their own code and message.
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let app_error = match self {
            ServiceError::App(app_error) => app_error,
            ServiceError::Db(db_error) => {
                tracing::error!(error = %db_error, "Storage error while handling request");
                AppError::new(ErrorCode::DatabaseError)
            }
        };
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlx_errors_become_db_faults() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Db(_)));
    }

    #[test]
    fn app_errors_keep_their_code() {
        let err = ServiceError::from(AppError::new(ErrorCode::OrderNotFound));
        match err {
            ServiceError::App(app) => assert_eq!(app.code, ErrorCode::OrderNotFound),
            ServiceError::Db(_) => panic!("expected App variant"),
        }
    }
}
