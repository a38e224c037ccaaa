//! Resolution routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::AppState;
use crate::error::{ApiResult, AppJson};
use windup_core::resolution::{CreateResolution, ResolutionService};

/// Creates the resolution routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/resolution",
        post(create_resolution)
            .get(get_resolution)
            .delete(delete_resolution),
    )
}

fn service(
    state: AppState,
) -> ResolutionService<windup_db::InsolvencyRepository, windup_core::clients::HttpCompanyProfileClient>
{
    ResolutionService::new(state.repository, state.profiles)
}

/// POST `/transactions/{transaction_id}/insolvency/resolution`
async fn create_resolution(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    AppJson(body): AppJson<CreateResolution>,
) -> ApiResult<impl IntoResponse> {
    let resolution = service(state).create(&transaction_id, body).await?;
    Ok((StatusCode::CREATED, Json(resolution)))
}

/// GET `/transactions/{transaction_id}/insolvency/resolution`
async fn get_resolution(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let resolution = service(state).get(&transaction_id).await?;
    Ok(Json(resolution))
}

/// DELETE `/transactions/{transaction_id}/insolvency/resolution`
async fn delete_resolution(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    service(state).delete(&transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
