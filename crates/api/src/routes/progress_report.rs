//! Progress-report routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::AppState;
use crate::error::{ApiResult, AppJson};
use windup_core::progress_report::{CreateProgressReport, ProgressReportService};

/// Creates the progress-report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/progress-report",
        post(create_report).get(get_report).delete(delete_report),
    )
}

fn service(
    state: AppState,
) -> ProgressReportService<
    windup_db::InsolvencyRepository,
    windup_core::clients::HttpCompanyProfileClient,
> {
    ProgressReportService::new(state.repository, state.profiles)
}

/// POST `/transactions/{transaction_id}/insolvency/progress-report`
async fn create_report(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    AppJson(body): AppJson<CreateProgressReport>,
) -> ApiResult<impl IntoResponse> {
    let report = service(state).create(&transaction_id, body).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET `/transactions/{transaction_id}/insolvency/progress-report`
async fn get_report(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let report = service(state).get(&transaction_id).await?;
    Ok(Json(report))
}

/// DELETE `/transactions/{transaction_id}/insolvency/progress-report`
async fn delete_report(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    service(state).delete(&transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
