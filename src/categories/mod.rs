use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo::{CategoryRegistry, DEFAULT_CATEGORY_COLOR};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::category_routes())
}
