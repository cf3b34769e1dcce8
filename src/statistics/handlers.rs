use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    dto::{StatisticsQuery, Summary},
    services::{summarize, DateRange},
};
use crate::{auth::jwt::AuthUser, error::AppResult, state::AppState};

pub fn statistics_routes() -> Router<AppState> {
    Router::new().route("/statistics", get(get_statistics))
}

#[instrument(skip(state, user, query), fields(user_id = %user.id))]
pub async fn get_statistics(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> AppResult<Json<Summary>> {
    let Query(query) = query?;
    let range = DateRange::from_query(query);
    let expenses = state.expenses.owned_by(&user.id).await;
    let summary = summarize(&expenses, range.as_ref(), &state.categories);
    debug!(rows = expenses.len(), windowed = range.is_some(), "statistics computed");
    Ok(Json(summary))
}
