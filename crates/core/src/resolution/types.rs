//! Resolution types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use windup_shared::{AppResult, types::mint_etag};

/// Resource kind marker for the resolution.
pub const RESOLUTION_KIND: &str = "insolvency#resolution";

/// The company's resolution to wind up: a dated statement plus exactly one
/// supporting document of type `resolution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Date the resolution was passed.
    pub date_of_resolution: NaiveDate,
    /// The single referenced attachment id.
    pub attachments: Vec<String>,
    /// Write-versioning tag.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
}

impl Resolution {
    /// Builds a resolution with a minted etag.
    ///
    /// # Errors
    ///
    /// Returns an error if the etag cannot be minted.
    pub fn build(date_of_resolution: NaiveDate, attachments: Vec<String>) -> AppResult<Self> {
        Ok(Self {
            date_of_resolution,
            attachments,
            etag: mint_etag()?,
            kind: RESOLUTION_KIND.to_string(),
        })
    }
}

/// Request body for creating a resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateResolution {
    /// Date the resolution was passed, `YYYY-MM-DD`.
    pub date_of_resolution: Option<String>,
    /// Referenced attachment ids; exactly one of type `resolution`.
    pub attachments: Option<Vec<String>>,
}
