//! Submission validation types.

use serde::Serialize;

use crate::attachment::Attachment;
use crate::case::InsolvencyCase;
use crate::practitioner::Practitioner;
use crate::progress_report::ProgressReport;
use crate::resolution::Resolution;
use crate::statement_of_affairs::StatementOfAffairs;

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// What failed.
    pub error: String,
    /// Where on the case it failed.
    pub location: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(error: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            location: location.into(),
        }
    }
}

/// The whole-case validation verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationStatus {
    /// True when every rule passed.
    pub is_valid: bool,
    /// Every failed rule; empty when valid.
    pub errors: Vec<ValidationError>,
}

impl ValidationStatus {
    /// A verdict from collected failures.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// A consistent read of the whole case aggregate.
#[derive(Debug, Clone)]
pub struct CaseSnapshot {
    /// The case header.
    pub case: InsolvencyCase,
    /// All practitioners, with their appointments.
    pub practitioners: Vec<Practitioner>,
    /// All attachment metadata.
    pub attachments: Vec<Attachment>,
    /// The resolution, if lodged.
    pub resolution: Option<Resolution>,
    /// The statement of affairs, if lodged.
    pub statement_of_affairs: Option<StatementOfAffairs>,
    /// The progress report, if lodged.
    pub progress_report: Option<ProgressReport>,
}
