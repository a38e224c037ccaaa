//! Token-permission interceptor.
//!
//! The upstream identity proxy authenticates the caller and forwards the
//! token's permissions in a header of space-separated `key=value,value`
//! pairs. Reads need `insolvency-cases=read`; writes need
//! `insolvency-cases=update`.

use axum::Json;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Header carrying the token permissions, set by the identity proxy.
pub const TOKEN_PERMISSIONS_HEADER: &str = "x-token-permissions";

const PERMISSION_KEY: &str = "insolvency-cases";

/// True when the raw header grants `key=value`.
fn has_permission(raw: &str, key: &str, value: &str) -> bool {
    raw.split_whitespace().any(|pair| {
        pair.split_once('=').is_some_and(|(pair_key, values)| {
            pair_key == key && values.split(',').any(|v| v == value)
        })
    })
}

fn required_permission(method: &Method) -> &'static str {
    if method == Method::GET || method == Method::HEAD {
        "read"
    } else {
        "update"
    }
}

/// Gate every request on the proxied token permissions.
///
/// A missing or undecodable header means the proxy contract is broken and
/// is an internal error; a decodable header without the needed permission
/// is unauthorized.
pub async fn token_permissions_middleware(request: Request, next: Next) -> Response {
    let raw = request
        .headers()
        .get(TOKEN_PERMISSIONS_HEADER)
        .map(|value| value.to_str());

    let raw = match raw {
        Some(Ok(raw)) => raw,
        Some(Err(_)) | None => {
            tracing::error!("token permissions header missing or undecodable");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "internal server error" })),
            )
                .into_response();
        }
    };

    let required = required_permission(request.method());
    if has_permission(raw, PERMISSION_KEY, required) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": format!("token does not grant {PERMISSION_KEY}={required}")
            })),
        )
            .into_response()
    }
}
