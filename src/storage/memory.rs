use std::sync::Mutex;

use async_trait::async_trait;

use super::{default_categories, Repository};
use crate::{auth::repo_types::User, categories::repo_types::Category, expenses::repo_types::Expense};

/// Process-local backend. Survives store rebuilds, not process restarts.
#[derive(Default)]
pub struct MemoryRepository {
    users: Mutex<Vec<User>>,
    expenses: Mutex<Vec<Expense>>,
    categories: Mutex<Vec<Category>>,
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("memory repository lock poisoned")
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn load_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().map_err(poisoned)?.clone())
    }

    async fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        *self.users.lock().map_err(poisoned)? = users.to_vec();
        Ok(())
    }

    async fn load_expenses(&self) -> anyhow::Result<Vec<Expense>> {
        Ok(self.expenses.lock().map_err(poisoned)?.clone())
    }

    async fn save_expenses(&self, expenses: &[Expense]) -> anyhow::Result<()> {
        *self.expenses.lock().map_err(poisoned)? = expenses.to_vec();
        Ok(())
    }

    async fn load_categories(&self) -> anyhow::Result<Vec<Category>> {
        let mut categories = self.categories.lock().map_err(poisoned)?;
        if categories.is_empty() {
            *categories = default_categories();
        }
        Ok(categories.clone())
    }
}
