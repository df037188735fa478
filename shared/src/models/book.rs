//! Book catalog model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Book entity as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    /// Unit price in major currency units, two decimal places
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
}
