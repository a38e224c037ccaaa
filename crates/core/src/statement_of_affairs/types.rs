//! Statement-of-affairs types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use windup_shared::{AppResult, types::mint_etag};

/// Resource kind marker for the statement of affairs.
pub const STATEMENT_OF_AFFAIRS_KIND: &str = "insolvency#statement-of-affairs";

/// The sworn statement of the company's financial position: a statement
/// date plus one or two statement attachments (director and/or liquidator),
/// optionally accompanied by a statement of concurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementOfAffairs {
    /// Date the statement was sworn.
    pub statement_date: NaiveDate,
    /// Referenced attachment ids.
    pub attachments: Vec<String>,
    /// Write-versioning tag.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
}

impl StatementOfAffairs {
    /// Builds a statement of affairs with a minted etag.
    ///
    /// # Errors
    ///
    /// Returns an error if the etag cannot be minted.
    pub fn build(statement_date: NaiveDate, attachments: Vec<String>) -> AppResult<Self> {
        Ok(Self {
            statement_date,
            attachments,
            etag: mint_etag()?,
            kind: STATEMENT_OF_AFFAIRS_KIND.to_string(),
        })
    }
}

/// Request body for creating a statement of affairs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStatementOfAffairs {
    /// Date the statement was sworn, `YYYY-MM-DD`.
    pub statement_date: Option<String>,
    /// Referenced attachment ids.
    pub attachments: Option<Vec<String>>,
}
