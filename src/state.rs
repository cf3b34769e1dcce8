use std::sync::Arc;

use crate::auth::{JwtKeys, UserStore};
use crate::categories::CategoryRegistry;
use crate::config::AppConfig;
use crate::expenses::ExpenseStore;
use crate::storage::{self, Repository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<UserStore>,
    pub expenses: Arc<ExpenseStore>,
    pub categories: CategoryRegistry,
}

impl AppState {
    /// Connects the configured backend, loads every collection and seeds demo data if asked.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let repo = storage::connect(&config).await?;
        let state = Self::from_parts(config, repo).await?;
        if state.config.seed_demo {
            crate::seed::seed_demo(&state).await?;
        }
        Ok(state)
    }

    pub async fn from_parts(config: AppConfig, repo: Arc<dyn Repository>) -> anyhow::Result<Self> {
        let categories = CategoryRegistry::load(repo.as_ref()).await?;
        let users = UserStore::load(repo.clone()).await?;
        let expenses = ExpenseStore::load(repo).await?;
        Ok(Self {
            jwt: JwtKeys::new(&config.jwt),
            config: Arc::new(config),
            users: Arc::new(users),
            expenses: Arc::new(expenses),
            categories,
        })
    }

    /// Empty in-memory state with a fixed test secret.
    pub async fn fake() -> anyhow::Result<Self> {
        Self::from_parts(
            AppConfig::ephemeral(),
            Arc::new(storage::MemoryRepository::default()),
        )
        .await
    }
}
