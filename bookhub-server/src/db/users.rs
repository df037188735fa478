//! User account operations

use shared::models::User;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Insert a new user, returning the generated id.
///
/// Returns the raw `sqlx::Error` so callers can tell the email unique
/// violation apart from other storage failures.
pub async fn create(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    password_hash: &str,
    phone: Option<&str>,
    address: Option<&str>,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (full_name, email, password_hash, phone, address, created_at)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(phone)
    .bind(address)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, BoxError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, full_name, email, password_hash, phone, address, created_at
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, BoxError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, full_name, email, password_hash, phone, address, created_at
         FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn update_password(
    pool: &PgPool,
    user_id: i64,
    password_hash: &str,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
