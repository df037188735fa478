//! Payment models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting gateway confirmation
    Pending,
    /// Gateway confirmed the charge
    Completed,
    /// Gateway reported failure or session expiry
    Failed,
}

impl PaymentStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Payment row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    /// Internal reference at creation, replaced by the gateway's
    /// payment intent id once the charge settles
    pub transaction_reference: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_db_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(PaymentStatus::from_db("refunded"), None);
    }
}
