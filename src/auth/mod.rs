use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use jwt::{AuthUser, JwtKeys};
pub use repo::UserStore;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
