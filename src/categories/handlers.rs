use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo_types::Category;
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.list().to_vec())
}
