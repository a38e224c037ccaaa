//! Email allow-list interceptor.
//!
//! The identity proxy forwards the authenticated user in a header whose
//! first `;`-separated segment is the email address. Only emails the
//! allow-list service knows are admitted. The whole gate can be switched
//! off by configuration for environments without an allow list.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::AppState;
use windup_core::clients::AllowListApi;

/// Header carrying the authenticated user, set by the identity proxy.
pub const AUTHORISED_USER_HEADER: &str = "x-authorised-user";

/// Extracts the email from the authenticated-user header value.
fn extract_email(raw: &str) -> Option<&str> {
    let email = raw.split(';').next().unwrap_or("").trim();
    if email.is_empty() { None } else { Some(email) }
}

/// Gate every request on the caller's email being allow-listed.
pub async fn allow_list_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.auth.disable_allow_list {
        return next.run(request).await;
    }

    let email = request
        .headers()
        .get(AUTHORISED_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_email);

    let Some(email) = email else {
        tracing::error!("authorised user header missing or undecodable");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "internal server error" })),
        )
            .into_response();
    };

    match state.allow_list.is_allowed(email).await {
        Ok(true) => next.run(request).await,
        Ok(false) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "user is not permitted to file insolvency cases" })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "allow list lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "internal server error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_extraction() {
        assert_eq!(extract_email("a@b"), Some("a@b"));
        assert_eq!(extract_email("a@b;forename=A;surname=B"), Some("a@b"));
        assert_eq!(extract_email(" a@b ;rest"), Some("a@b"));
        assert_eq!(extract_email(""), None);
        assert_eq!(extract_email(";forename=A"), None);
    }
}
