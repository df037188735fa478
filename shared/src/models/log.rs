//! Audit log model

use serde::{Deserialize, Serialize};

/// Append-only audit log row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LogEntry {
    pub id: i64,
    /// Acting user, `None` for system-initiated events (webhooks)
    pub user_id: Option<i64>,
    pub action: String,
    pub details: String,
    /// Epoch milliseconds
    pub created_at: i64,
}
