//! Durable storage capability.
//!
//! Every collection is loaded whole and saved whole; the stores above keep the
//! working set in memory and call `save_*` with the complete, already-mutated
//! collection before publishing it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    auth::repo_types::User,
    categories::repo_types::Category,
    config::{AppConfig, StorageBackend},
    expenses::repo_types::Expense,
};

mod json;
mod memory;
mod postgres;

pub use json::JsonFileRepository;
pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn load_users(&self) -> anyhow::Result<Vec<User>>;
    async fn save_users(&self, users: &[User]) -> anyhow::Result<()>;
    async fn load_expenses(&self) -> anyhow::Result<Vec<Expense>>;
    async fn save_expenses(&self, expenses: &[Expense]) -> anyhow::Result<()>;
    /// Returns the registry, seeding [`default_categories`] on first use.
    async fn load_categories(&self) -> anyhow::Result<Vec<Category>>;
}

pub fn default_categories() -> Vec<Category> {
    [
        (1, "Food & Dining", "#28a745"),
        (2, "Transportation", "#007bff"),
        (3, "Shopping", "#ffc107"),
        (4, "Entertainment", "#dc3545"),
        (5, "Bills & Utilities", "#6f42c1"),
        (6, "Healthcare", "#fd7e14"),
        (7, "Education", "#20c997"),
        (8, "Other", "#6c757d"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id,
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// Builds the backend selected in the configuration.
pub async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn Repository>> {
    let repo: Arc<dyn Repository> = match config.storage {
        StorageBackend::Json => Arc::new(JsonFileRepository::open(&config.data_dir).await?),
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not configured"))?;
            Arc::new(PgRepository::connect(url).await?)
        }
        StorageBackend::Memory => Arc::new(MemoryRepository::default()),
    };
    tracing::info!(backend = ?config.storage, "storage ready");
    Ok(repo)
}
