//! Submission validation service.

use windup_shared::{AppError, AppResult};

use super::types::{CaseSnapshot, ValidationStatus};
use super::validator::validate_case;
use crate::clients::CompanyProfileApi;

/// Store operations the submission gate needs: one consistent read of the
/// whole aggregate.
pub trait SubmissionStore: Send + Sync {
    /// Loads the case and all its children, or `None` when no case exists
    /// for the transaction.
    fn load_snapshot(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<CaseSnapshot>>> + Send;
}

impl<T: SubmissionStore> SubmissionStore for std::sync::Arc<T> {
    fn load_snapshot(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<CaseSnapshot>>> + Send {
        (**self).load_snapshot(transaction_id)
    }
}

/// Submission validation service. Performs reads only.
pub struct SubmissionService<S, P> {
    store: S,
    profiles: P,
}

impl<S, P> SubmissionService<S, P>
where
    S: SubmissionStore,
    P: CompanyProfileApi,
{
    /// Creates the service.
    pub const fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    /// Runs the whole-case validation gate.
    ///
    /// # Errors
    ///
    /// `NotFound` when no case exists for the transaction; dependency
    /// errors when the company profile cannot be read.
    pub async fn validation_status(&self, transaction_id: &str) -> AppResult<ValidationStatus> {
        let snapshot = self
            .store
            .load_snapshot(transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no insolvency case found for transaction [{transaction_id}]"
                ))
            })?;

        let profile = self.profiles.fetch(&snapshot.case.company_number).await?;
        let verdict = validate_case(&snapshot, profile.date_of_creation);
        tracing::info!(
            transaction_id,
            is_valid = verdict.is_valid,
            error_count = verdict.errors.len(),
            "validation status evaluated"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::service::test_support::FixedProfiles;
    use crate::case::{CaseType, InsolvencyCase};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSnapshots {
        snapshots: Mutex<HashMap<String, CaseSnapshot>>,
    }

    impl SubmissionStore for MockSnapshots {
        async fn load_snapshot(
            &self,
            transaction_id: &str,
        ) -> AppResult<Option<CaseSnapshot>> {
            Ok(self.snapshots.lock().unwrap().get(transaction_id).cloned())
        }
    }

    #[tokio::test]
    async fn test_absent_case_is_not_found() {
        let svc = SubmissionService::new(MockSnapshots::default(), FixedProfiles);
        let err = svc.validation_status("12345678").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_empty_case_reports_missing_substance() {
        let store = MockSnapshots::default();
        store.snapshots.lock().unwrap().insert(
            "12345678".to_string(),
            CaseSnapshot {
                case: InsolvencyCase::build(
                    "12345678",
                    CaseType::CreditorsVoluntaryLiquidation,
                    "01234567".to_string(),
                    "companyName".to_string(),
                )
                .unwrap(),
                practitioners: Vec::new(),
                attachments: Vec::new(),
                resolution: None,
                statement_of_affairs: None,
                progress_report: None,
            },
        );

        let svc = SubmissionService::new(store, FixedProfiles);
        let verdict = svc.validation_status("12345678").await.unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.errors[0].error,
            super::super::validator::EMPTY_CASE_ERROR
        );
    }
}
