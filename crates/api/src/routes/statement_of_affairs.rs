//! Statement-of-affairs routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::AppState;
use crate::error::{ApiResult, AppJson};
use windup_core::statement_of_affairs::{CreateStatementOfAffairs, StatementOfAffairsService};

/// Creates the statement-of-affairs routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/statement-of-affairs",
        post(create_statement)
            .get(get_statement)
            .delete(delete_statement),
    )
}

fn service(
    state: AppState,
) -> StatementOfAffairsService<
    windup_db::InsolvencyRepository,
    windup_core::clients::HttpCompanyProfileClient,
> {
    StatementOfAffairsService::new(state.repository, state.profiles)
}

/// POST `/transactions/{transaction_id}/insolvency/statement-of-affairs`
async fn create_statement(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    AppJson(body): AppJson<CreateStatementOfAffairs>,
) -> ApiResult<impl IntoResponse> {
    let statement = service(state).create(&transaction_id, body).await?;
    Ok((StatusCode::CREATED, Json(statement)))
}

/// GET `/transactions/{transaction_id}/insolvency/statement-of-affairs`
async fn get_statement(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let statement = service(state).get(&transaction_id).await?;
    Ok(Json(statement))
}

/// DELETE `/transactions/{transaction_id}/insolvency/statement-of-affairs`
async fn delete_statement(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    service(state).delete(&transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
