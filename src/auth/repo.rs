use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    storage::Repository,
};

/// Registered users, persisted as a whole collection on every insert.
pub struct UserStore {
    repo: Arc<dyn Repository>,
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub async fn load(repo: Arc<dyn Repository>) -> anyhow::Result<Self> {
        let users = repo.load_users().await.context("load users")?;
        Ok(Self {
            repo,
            users: RwLock::new(users),
        })
    }

    /// First user whose username or email equals `login`.
    pub async fn find_by_login(&self, login: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Appends `user` unless its username or email is already taken.
    pub async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict("Username or email already exists".into()));
        }

        let mut next = users.clone();
        next.push(user.clone());
        self.repo.save_users(&next).await.context("persist users")?;
        *users = next;
        Ok(user)
    }
}
