//! User account model

use serde::{Deserialize, Serialize};

/// User row including the password hash
///
/// Deliberately does not implement `Serialize` so the hash can never
/// leak into an API response. Use [`UserPublic`] for client-facing views.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Client-facing view of a user (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            created_at: user.created_at,
        }
    }
}
