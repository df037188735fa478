//! Audit log operations

use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Write an audit log entry
pub async fn append(
    pool: &PgPool,
    user_id: Option<i64>,
    action: &str,
    details: &str,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query("INSERT INTO logs (user_id, action, details, created_at) VALUES ($1, $2, $3, $4)")
        .bind(user_id)
        .bind(action)
        .bind(details)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
