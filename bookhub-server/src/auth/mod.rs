//! Authentication middleware and rate limiting

pub mod rate_limit;
pub mod user_auth;

pub use user_auth::AuthUser;
