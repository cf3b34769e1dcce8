use serde::{Deserialize, Serialize};

use super::repo_types::Expense;

/// `amount` as sent by clients: a number, a numeric string, or anything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Body of POST /expenses and PUT /expenses/:id. Fields are optional so that
/// absence is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePayload {
    pub description: Option<String>,
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// An expense joined with its category registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseView {
    #[serde(flatten)]
    pub expense: Expense,
    pub category_name: String,
    pub category_color: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}
