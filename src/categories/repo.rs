use std::sync::Arc;

use anyhow::Context;

use super::repo_types::Category;
use crate::storage::Repository;

/// Color used when an expense's label has no registry entry.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6c757d";

/// Read-only category reference data, loaded once at startup.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Arc<Vec<Category>>,
}

impl CategoryRegistry {
    pub async fn load(repo: &dyn Repository) -> anyhow::Result<Self> {
        let categories = repo.load_categories().await.context("load categories")?;
        Ok(Self::new(categories))
    }

    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: Arc::new(categories),
        }
    }

    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn lookup(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Best-effort join: the registry color for `label`, or the default.
    pub fn color_for(&self, label: &str) -> &str {
        self.lookup(label)
            .map(|c| c.color.as_str())
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}
