//! The progress-report sub-resource.

pub mod service;
pub mod types;

pub use service::{ProgressReportService, ProgressReportStore};
pub use types::{CreateProgressReport, PROGRESS_REPORT_KIND, ProgressReport};
