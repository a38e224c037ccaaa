//! Whole-case validation gate route.
//!
//! Called by the transaction service before it allows its transaction to
//! close. Always 200 with the verdict; the verdict body carries every
//! failure.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::AppState;
use crate::error::ApiResult;
use windup_core::submission::SubmissionService;

/// Creates the validation-status route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/validation-status", get(validation_status))
}

/// GET `/transactions/{transaction_id}/insolvency/validation-status`
async fn validation_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let service = SubmissionService::new(state.repository, state.profiles);
    let verdict = service.validation_status(&transaction_id).await?;
    Ok(Json(verdict))
}
