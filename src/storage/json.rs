use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{default_categories, Repository};
use crate::{auth::repo_types::User, categories::repo_types::Category, expenses::repo_types::Expense};

const USERS_FILE: &str = "users.json";
const EXPENSES_FILE: &str = "expenses.json";
const CATEGORIES_FILE: &str = "categories.json";

/// Flat-file snapshot backend: one pretty-printed JSON array per collection.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    pub async fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    async fn read<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Vec<T>> {
        let path = self.dir.join(name);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };
        serde_json::from_slice(&raw).with_context(|| format!("parse {}", path.display()))
    }

    /// Writes to a sibling temp file and renames it into place.
    async fn write<T: Serialize>(&self, name: &str, rows: &[T]) -> anyhow::Result<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!(".{name}.tmp"));
        let body = serde_json::to_vec_pretty(rows).context("encode snapshot")?;
        tokio::fs::write(&tmp, &body)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("replace {}", path.display()))?;
        debug!(file = %path.display(), rows = rows.len(), "snapshot saved");
        Ok(())
    }
}

#[async_trait]
impl Repository for JsonFileRepository {
    async fn load_users(&self) -> anyhow::Result<Vec<User>> {
        self.read(USERS_FILE).await
    }

    async fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        self.write(USERS_FILE, users).await
    }

    async fn load_expenses(&self) -> anyhow::Result<Vec<Expense>> {
        self.read(EXPENSES_FILE).await
    }

    async fn save_expenses(&self, expenses: &[Expense]) -> anyhow::Result<()> {
        self.write(EXPENSES_FILE, expenses).await
    }

    async fn load_categories(&self) -> anyhow::Result<Vec<Category>> {
        let categories: Vec<Category> = self.read(CATEGORIES_FILE).await?;
        if !categories.is_empty() {
            return Ok(categories);
        }
        let seeded = default_categories();
        self.write(CATEGORIES_FILE, &seeded).await?;
        Ok(seeded)
    }
}
