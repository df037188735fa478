//! Data models
//!
//! Shared between bookhub-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), timestamps are epoch milliseconds.

pub mod book;
pub mod log;
pub mod order;
pub mod payment;
pub mod user;

// Re-exports
pub use book::*;
pub use log::*;
pub use order::*;
pub use payment::*;
pub use user::*;
