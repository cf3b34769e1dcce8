use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{default_categories, Repository};
use crate::{auth::repo_types::User, categories::repo_types::Category, expenses::repo_types::Expense};

/// Relational backend. Each save replaces the table inside one transaction;
/// `position` keeps the collection order stable across reloads.
#[derive(Clone)]
pub struct PgRepository {
    db: PgPool,
}

impl PgRepository {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        Ok(Self { db })
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn load_users(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("load users")?;
        Ok(rows)
    }

    async fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .context("clear users")?;
        for (position, u) in users.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO users (id, username, email, password_hash, created_at, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&u.id)
            .bind(&u.username)
            .bind(&u.email)
            .bind(&u.password_hash)
            .bind(u.created_at)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert user {}", u.id))?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn load_expenses(&self) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, description, amount, category, date, created_at
            FROM expenses
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("load expenses")?;
        Ok(rows)
    }

    async fn save_expenses(&self, expenses: &[Expense]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("DELETE FROM expenses")
            .execute(&mut *tx)
            .await
            .context("clear expenses")?;
        for (position, e) in expenses.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO expenses (id, user_id, description, amount, category, date, created_at, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&e.id)
            .bind(&e.user_id)
            .bind(&e.description)
            .bind(e.amount)
            .bind(&e.category)
            .bind(&e.date)
            .bind(e.created_at)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert expense {}", e.id))?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn load_categories(&self) -> anyhow::Result<Vec<Category>> {
        let query = r#"SELECT id, name, color FROM categories ORDER BY id ASC"#;
        let rows = sqlx::query_as::<_, Category>(query)
            .fetch_all(&self.db)
            .await
            .context("load categories")?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        let seeded = default_categories();
        let mut tx = self.db.begin().await.context("begin tx")?;
        for c in &seeded {
            sqlx::query(
                r#"
                INSERT INTO categories (id, name, color)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.color)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("seed category {}", c.name))?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(seeded)
    }
}
