use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{DeletedResponse, ExpensePayload, ExpenseView},
    repo_types::Expense,
    services::{enrich, validate_payload},
};
use crate::{auth::jwt::AuthUser, error::AppResult, state::AppState};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ExpenseView>>> {
    let items = state
        .expenses
        .list_by_user(&user.id)
        .await
        .into_iter()
        .map(|e| enrich(e, &state.categories))
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ExpenseView>> {
    let expense = state.expenses.get(&user.id, &id).await?;
    Ok(Json(enrich(expense, &state.categories)))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let Json(payload) = payload?;
    let draft = validate_payload(payload, state.config.amount_policy)?;
    let expense = state.expenses.create(&user.id, draft).await?;
    info!(expense_id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> AppResult<Json<Expense>> {
    let Json(payload) = payload?;
    let draft = validate_payload(payload, state.config.amount_policy)?;
    let expense = state.expenses.update(&user.id, &id, draft).await?;
    info!(expense_id = %expense.id, "expense updated");
    Ok(Json(expense))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    state.expenses.delete(&user.id, &id).await?;
    info!(expense_id = %id, "expense deleted");
    Ok(Json(DeletedResponse {
        message: "Expense deleted successfully",
    }))
}
