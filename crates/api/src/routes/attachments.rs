//! Attachment routes: multipart upload, metadata, download, delete.

use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;

use crate::AppState;
use crate::error::ApiResult;
use windup_core::attachment::AttachmentService;
use windup_core::validation::fields::MissingFields;
use windup_shared::AppError;

/// Creates the attachment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attachments", post(upload_attachment))
        .route(
            "/attachments/{attachment_id}",
            get(get_attachment).delete(delete_attachment),
        )
        .route("/attachments/{attachment_id}/download", get(download_attachment))
}

fn service(
    state: AppState,
) -> AttachmentService<windup_db::InsolvencyRepository, windup_core::clients::HttpFileTransferClient>
{
    AttachmentService::new(state.repository, state.files)
}

/// One decoded multipart upload: the `attachment_type` field and the
/// `file` part.
struct UploadParts {
    attachment_type: String,
    filename: String,
    content_type: String,
    body: Bytes,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadParts, AppError> {
    let mut attachment_type: Option<String> = None;
    let mut file: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("attachment_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?;
                attachment_type = Some(value);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?;
                file = Some((filename, content_type, body));
            }
            _ => {}
        }
    }

    let mut missing = MissingFields::new();
    missing
        .check("attachment_type", attachment_type.is_some())
        .check("file", file.is_some());
    missing.into_result()?;
    let (Some(attachment_type), Some((filename, content_type, body))) = (attachment_type, file)
    else {
        return Err(AppError::internal("required fields vanished after check"));
    };

    Ok(UploadParts {
        attachment_type,
        filename,
        content_type,
        body,
    })
}

/// POST `/transactions/{transaction_id}/insolvency/attachments`
async fn upload_attachment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let parts = read_upload(multipart).await?;
    let attachment = service(state)
        .upload(
            &transaction_id,
            &parts.attachment_type,
            &parts.filename,
            &parts.content_type,
            parts.body,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// GET `/transactions/{transaction_id}/insolvency/attachments/{attachment_id}`
async fn get_attachment(
    State(state): State<AppState>,
    Path((transaction_id, attachment_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let details = service(state)
        .get_details(&transaction_id, &attachment_id)
        .await?;
    Ok(Json(details))
}

/// GET `/transactions/{transaction_id}/insolvency/attachments/{attachment_id}/download`
///
/// Served only when the anti-virus scan reports clean.
async fn download_attachment(
    State(state): State<AppState>,
    Path((transaction_id, attachment_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let (body, content_type, name) = service(state)
        .download(&transaction_id, &attachment_id)
        .await?;
    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        ),
    ];
    Ok((headers, body))
}

/// DELETE `/transactions/{transaction_id}/insolvency/attachments/{attachment_id}`
async fn delete_attachment(
    State(state): State<AppState>,
    Path((transaction_id, attachment_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    service(state)
        .delete(&transaction_id, &attachment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
