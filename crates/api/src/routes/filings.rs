//! Filings view route.
//!
//! A non-live rendering of the case as filing resources, gated by the
//! `enable_non_live_routes` toggle. Live filing generation happens
//! downstream of the transaction service; this view exists for inspection
//! in pre-production environments.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use windup_core::submission::{CaseSnapshot, SubmissionStore};
use windup_shared::{AppError, AppResult};

/// Creates the filings route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/filings", get(filings))
}

/// One filing resource rendered from the case.
#[derive(Debug, Serialize)]
struct Filing {
    /// The kind of the lodged resource.
    kind: String,
    /// Resource payload.
    data: serde_json::Value,
}

fn render_filings(snapshot: &CaseSnapshot) -> AppResult<Vec<Filing>> {
    let mut filings = Vec::new();

    if let Some(resolution) = &snapshot.resolution {
        filings.push(Filing {
            kind: resolution.kind.clone(),
            data: serde_json::to_value(resolution).map_err(AppError::internal)?,
        });
    }
    if let Some(statement) = &snapshot.statement_of_affairs {
        filings.push(Filing {
            kind: statement.kind.clone(),
            data: serde_json::to_value(statement).map_err(AppError::internal)?,
        });
    }
    if let Some(report) = &snapshot.progress_report {
        filings.push(Filing {
            kind: report.kind.clone(),
            data: serde_json::to_value(report).map_err(AppError::internal)?,
        });
    }
    if !snapshot.practitioners.is_empty() {
        filings.push(Filing {
            kind: "insolvency#practitioners".to_string(),
            data: serde_json::to_value(&snapshot.practitioners).map_err(AppError::internal)?,
        });
    }

    Ok(filings)
}

/// GET `/transactions/{transaction_id}/insolvency/filings`
async fn filings(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.auth.enable_non_live_routes {
        return Err(ApiError(AppError::NotFound("resource not found".to_string())));
    }

    let snapshot = state
        .repository
        .load_snapshot(&transaction_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no insolvency case found for transaction [{transaction_id}]"
            ))
        })?;

    let filings = render_filings(&snapshot)?;
    Ok(Json(json!({ "filings": filings })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use windup_core::case::{CaseType, InsolvencyCase};
    use windup_core::resolution::Resolution;

    #[test]
    fn test_render_lodged_resources_only() {
        let snapshot = CaseSnapshot {
            case: InsolvencyCase::build(
                "12345678",
                CaseType::CreditorsVoluntaryLiquidation,
                "01234567".to_string(),
                "companyName".to_string(),
            )
            .unwrap(),
            practitioners: Vec::new(),
            attachments: Vec::new(),
            resolution: Some(
                Resolution::build(
                    chrono::NaiveDate::from_ymd_opt(2012, 1, 23).unwrap(),
                    vec!["file-1".to_string()],
                )
                .unwrap(),
            ),
            statement_of_affairs: None,
            progress_report: None,
        };

        let filings = render_filings(&snapshot).unwrap();
        assert_eq!(filings.len(), 1);
        assert_eq!(filings[0].kind, "insolvency#resolution");
        assert_eq!(filings[0].data["attachments"][0], "file-1");
    }
}
