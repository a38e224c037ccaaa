//! Case creation route.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::{ApiResult, AppJson};
use crate::AppState;
use windup_core::case::{CaseService, CreateCase};

/// Creates the case routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_case))
}

/// POST `/transactions/{transaction_id}/insolvency`
async fn create_case(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    AppJson(body): AppJson<CreateCase>,
) -> ApiResult<impl IntoResponse> {
    let service = CaseService::new(
        state.repository,
        state.transactions,
        state.profiles,
        state.alpha_key,
    );
    let case = service.create_case(&transaction_id, body).await?;
    Ok((StatusCode::CREATED, Json(case)))
}
