//! Progress-report types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use windup_shared::{AppResult, types::mint_etag};

/// Resource kind marker for the progress report.
pub const PROGRESS_REPORT_KIND: &str = "insolvency#progress-report";

/// A periodic report covering a date range, with exactly one supporting
/// document of type `progress-report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Start of the reporting period.
    pub from_date: NaiveDate,
    /// End of the reporting period; never before `from_date`.
    pub to_date: NaiveDate,
    /// The single referenced attachment id.
    pub attachments: Vec<String>,
    /// Write-versioning tag.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
}

impl ProgressReport {
    /// Builds a progress report with a minted etag.
    ///
    /// # Errors
    ///
    /// Returns an error if the etag cannot be minted.
    pub fn build(
        from_date: NaiveDate,
        to_date: NaiveDate,
        attachments: Vec<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            from_date,
            to_date,
            attachments,
            etag: mint_etag()?,
            kind: PROGRESS_REPORT_KIND.to_string(),
        })
    }
}

/// Request body for creating a progress report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProgressReport {
    /// Start of the reporting period, `YYYY-MM-DD`.
    pub from_date: Option<String>,
    /// End of the reporting period, `YYYY-MM-DD`.
    pub to_date: Option<String>,
    /// Referenced attachment ids; exactly one of type `progress-report`.
    pub attachments: Option<Vec<String>>,
}
