use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::repo_types::{Expense, ExpenseDraft};
use crate::{
    error::{AppError, AppResult},
    storage::Repository,
};

#[derive(Debug, Clone)]
struct Ledger {
    rows: Vec<Expense>,
    /// `None` once `u64::MAX` has been handed out.
    next_id: Option<u64>,
}

impl Ledger {
    fn position(&self, user_id: &str, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|e| e.id == id && e.user_id == user_id)
    }
}

/// Owner-scoped expense collection.
///
/// Reads share the lock. A mutation holds the write lock while it edits a copy
/// of the ledger, persists that copy, and only then publishes it, so readers
/// never see state that has not been saved.
pub struct ExpenseStore {
    repo: Arc<dyn Repository>,
    ledger: RwLock<Ledger>,
}

impl ExpenseStore {
    pub async fn load(repo: Arc<dyn Repository>) -> anyhow::Result<Self> {
        let rows = repo.load_expenses().await.context("load expenses")?;
        let next_id = rows
            .iter()
            .filter_map(|e| e.id.parse::<u64>().ok())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        match next_id {
            Some(next_id) => debug!(rows = rows.len(), next_id, "expense ledger loaded"),
            None => warn!(rows = rows.len(), "expense ids exhausted; creates will fail"),
        }
        Ok(Self {
            repo,
            ledger: RwLock::new(Ledger { rows, next_id }),
        })
    }

    /// The caller's expenses, newest `date` first; equal dates keep insertion order.
    pub async fn list_by_user(&self, user_id: &str) -> Vec<Expense> {
        let mut rows = self.owned_by(user_id).await;
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    /// The caller's expenses in insertion order.
    pub async fn owned_by(&self, user_id: &str) -> Vec<Expense> {
        let ledger = self.ledger.read().await;
        ledger
            .rows
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn get(&self, user_id: &str, id: &str) -> AppResult<Expense> {
        let ledger = self.ledger.read().await;
        ledger
            .position(user_id, id)
            .map(|i| ledger.rows[i].clone())
            .ok_or(AppError::NotFound("Expense"))
    }

    pub async fn create(&self, user_id: &str, draft: ExpenseDraft) -> AppResult<Expense> {
        self.commit(|ledger| {
            let id = ledger
                .next_id
                .ok_or_else(|| anyhow::anyhow!("expense id space exhausted"))?;
            let expense = Expense {
                id: id.to_string(),
                user_id: user_id.to_string(),
                description: draft.description,
                amount: draft.amount,
                category: draft.category,
                date: draft.date,
                created_at: OffsetDateTime::now_utc(),
            };
            ledger.next_id = id.checked_add(1);
            ledger.rows.push(expense.clone());
            Ok(expense)
        })
        .await
    }

    pub async fn update(&self, user_id: &str, id: &str, draft: ExpenseDraft) -> AppResult<Expense> {
        self.commit(|ledger| {
            let i = ledger
                .position(user_id, id)
                .ok_or(AppError::NotFound("Expense"))?;
            let row = &mut ledger.rows[i];
            row.description = draft.description;
            row.amount = draft.amount;
            row.category = draft.category;
            row.date = draft.date;
            Ok(row.clone())
        })
        .await
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        self.commit(|ledger| {
            let i = ledger
                .position(user_id, id)
                .ok_or(AppError::NotFound("Expense"))?;
            ledger.rows.remove(i);
            Ok(())
        })
        .await
    }

    async fn commit<T>(&self, mutate: impl FnOnce(&mut Ledger) -> AppResult<T>) -> AppResult<T> {
        let mut ledger = self.ledger.write().await;
        let mut next = ledger.clone();
        let out = mutate(&mut next)?;
        self.repo
            .save_expenses(&next.rows)
            .await
            .context("persist expenses")?;
        *ledger = next;
        Ok(out)
    }
}
