//! Optional demo fixtures: a `demo` / `password` account with two expenses.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{password::hash_password_blocking, repo_types::User},
    expenses::repo_types::ExpenseDraft,
    state::AppState,
};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "password";

/// Only runs against an empty user collection.
pub async fn seed_demo(state: &AppState) -> anyhow::Result<()> {
    if !state.users.is_empty().await {
        return Ok(());
    }

    let user = state
        .users
        .insert(User {
            id: Uuid::new_v4().to_string(),
            username: DEMO_USERNAME.into(),
            email: "demo@example.com".into(),
            password_hash: hash_password_blocking(DEMO_PASSWORD.into()).await?,
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;

    for (description, amount, category, date) in [
        ("Grocery shopping", 150.50, "Food & Dining", "2024-01-15"),
        ("Gas station", 45.00, "Transportation", "2024-01-14"),
    ] {
        let draft = ExpenseDraft {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        };
        state.expenses.create(&user.id, draft).await?;
    }

    info!(user_id = %user.id, "demo data seeded");
    Ok(())
}
