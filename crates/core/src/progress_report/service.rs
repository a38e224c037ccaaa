//! Progress-report rules.

use windup_shared::{AppError, AppResult};

use super::types::{CreateProgressReport, ProgressReport};
use crate::attachment::{AttachmentStore, AttachmentType};
use crate::clients::CompanyProfileApi;
use crate::validation::dates::{is_before, parse_filing_date, validate_filing_window};
use crate::validation::fields::MissingFields;

/// Store operations the progress-report rules need.
pub trait ProgressReportStore: AttachmentStore {
    /// Embeds the progress report on the case.
    fn create_progress_report(
        &self,
        transaction_id: &str,
        report: &ProgressReport,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Fetches the case's progress report.
    fn get_progress_report(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<ProgressReport>>> + Send;

    /// Deletes the case's progress report. Deleting an absent one is
    /// `NotFound`.
    fn delete_progress_report(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: ProgressReportStore> ProgressReportStore for std::sync::Arc<T> {
    fn create_progress_report(
        &self,
        transaction_id: &str,
        report: &ProgressReport,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).create_progress_report(transaction_id, report)
    }

    fn get_progress_report(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<ProgressReport>>> + Send {
        (**self).get_progress_report(transaction_id)
    }

    fn delete_progress_report(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_progress_report(transaction_id)
    }
}

/// Progress-report service.
pub struct ProgressReportService<S, P> {
    store: S,
    profiles: P,
}

impl<S, P> ProgressReportService<S, P>
where
    S: ProgressReportStore,
    P: CompanyProfileApi,
{
    /// Creates the service.
    pub const fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    /// Creates the case's progress report.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for structural, date-order, window or
    /// reference problems; `NotFound` for a missing case; `Conflict` when
    /// a progress report already exists.
    pub async fn create(
        &self,
        transaction_id: &str,
        request: CreateProgressReport,
    ) -> AppResult<ProgressReport> {
        let mut missing = MissingFields::new();
        missing
            .check("from_date", request.from_date.is_some())
            .check("to_date", request.to_date.is_some())
            .check("attachments", request.attachments.is_some());
        missing.into_result()?;

        let (Some(from_raw), Some(to_raw), Some(attachments)) =
            (request.from_date, request.to_date, request.attachments)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        let from_date = parse_filing_date("from_date", &from_raw)?;
        let to_date = parse_filing_date("to_date", &to_raw)?;
        if is_before(to_date, from_date) {
            return Err(AppError::Validation(
                "to_date must not be before from_date".to_string(),
            ));
        }

        let Some(case) = self.store.get_case(transaction_id).await? else {
            return Err(AppError::NotFound(format!(
                "no insolvency case found for transaction [{transaction_id}]"
            )));
        };

        if self.store.get_progress_report(transaction_id).await?.is_some() {
            return Err(AppError::Conflict(
                "a progress report already exists for this case".to_string(),
            ));
        }

        let [attachment_id] = attachments.as_slice() else {
            return Err(AppError::Validation(
                "a progress report requires exactly one attachment".to_string(),
            ));
        };
        let attachment = self
            .store
            .get_attachment(transaction_id, attachment_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "attachment [{attachment_id}] does not exist on this case"
                ))
            })?;
        if attachment.attachment_type != AttachmentType::ProgressReport {
            return Err(AppError::Validation(format!(
                "attachment [{attachment_id}] is not of type [progress-report]"
            )));
        }

        let profile = self.profiles.fetch(&case.company_number).await?;
        validate_filing_window("from_date", from_date, profile.date_of_creation)?;
        validate_filing_window("to_date", to_date, profile.date_of_creation)?;

        let report = ProgressReport::build(from_date, to_date, attachments)?;
        self.store
            .create_progress_report(transaction_id, &report)
            .await?;
        tracing::info!(transaction_id, "progress report created");
        Ok(report)
    }

    /// Fetches the case's progress report.
    ///
    /// # Errors
    ///
    /// `NotFound` when none exists.
    pub async fn get(&self, transaction_id: &str) -> AppResult<ProgressReport> {
        self.store
            .get_progress_report(transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("no progress report found on this case".to_string())
            })
    }

    /// Deletes the case's progress report.
    ///
    /// # Errors
    ///
    /// `NotFound` when none exists.
    pub async fn delete(&self, transaction_id: &str) -> AppResult<()> {
        self.store.delete_progress_report(transaction_id).await?;
        tracing::info!(transaction_id, "progress report deleted");
        Ok(())
    }
}
