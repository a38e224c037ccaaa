//! Practitioner and appointment routes.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::error::{ApiResult, AppJson};
use windup_core::practitioner::{AppointPractitioner, CreatePractitioner, PractitionerService};

/// Creates the practitioner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/practitioners", post(create_practitioner).get(list_practitioners))
        .route(
            "/practitioners/{practitioner_id}",
            get(get_practitioner).delete(delete_practitioner),
        )
        .route(
            "/practitioners/{practitioner_id}/appointment",
            post(appoint).get(get_appointment).delete(delete_appointment),
        )
}

fn service(state: AppState) -> PractitionerService<windup_db::InsolvencyRepository, windup_core::clients::HttpCompanyProfileClient> {
    PractitionerService::new(state.repository, state.profiles)
}

/// POST `/transactions/{transaction_id}/insolvency/practitioners`
async fn create_practitioner(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    AppJson(body): AppJson<CreatePractitioner>,
) -> ApiResult<impl IntoResponse> {
    let practitioner = service(state)
        .create_practitioner(&transaction_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(practitioner)))
}

/// GET `/transactions/{transaction_id}/insolvency/practitioners`
async fn list_practitioners(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let practitioners = service(state).list_practitioners(&transaction_id).await?;
    Ok(Json(json!({ "practitioners": practitioners })))
}

/// GET `/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}`
async fn get_practitioner(
    State(state): State<AppState>,
    Path((transaction_id, practitioner_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let practitioner = service(state)
        .get_practitioner(&transaction_id, &practitioner_id)
        .await?;
    Ok(Json(practitioner))
}

/// DELETE `/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}`
async fn delete_practitioner(
    State(state): State<AppState>,
    Path((transaction_id, practitioner_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    service(state)
        .delete_practitioner(&transaction_id, &practitioner_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}/appointment`
async fn appoint(
    State(state): State<AppState>,
    Path((transaction_id, practitioner_id)): Path<(String, String)>,
    AppJson(body): AppJson<AppointPractitioner>,
) -> ApiResult<impl IntoResponse> {
    let appointment = service(state)
        .appoint(&transaction_id, &practitioner_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET `/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}/appointment`
async fn get_appointment(
    State(state): State<AppState>,
    Path((transaction_id, practitioner_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let appointment = service(state)
        .get_appointment(&transaction_id, &practitioner_id)
        .await?;
    Ok(Json(appointment))
}

/// DELETE `/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}/appointment`
///
/// Conditional on the appointment's current etag in `If-Match`.
async fn delete_appointment(
    State(state): State<AppState>,
    Path((transaction_id, practitioner_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let etag = headers
        .get(header::IF_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_matches('"'));
    service(state)
        .delete_appointment(&transaction_id, &practitioner_id, etag)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
