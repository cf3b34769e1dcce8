use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Expense record as persisted. `category` is a free-text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String, // YYYY-MM-DD
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The four client-controlled fields, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}
