//! Statement-of-affairs rules.

use windup_shared::{AppError, AppResult};

use super::types::{CreateStatementOfAffairs, StatementOfAffairs};
use crate::attachment::{AttachmentStore, AttachmentType};
use crate::clients::CompanyProfileApi;
use crate::validation::dates::{parse_filing_date, validate_filing_window};
use crate::validation::fields::MissingFields;

/// Store operations the statement-of-affairs rules need.
pub trait StatementOfAffairsStore: AttachmentStore {
    /// Embeds the statement of affairs on the case.
    fn create_statement_of_affairs(
        &self,
        transaction_id: &str,
        statement: &StatementOfAffairs,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Fetches the case's statement of affairs.
    fn get_statement_of_affairs(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<StatementOfAffairs>>> + Send;

    /// Deletes the case's statement of affairs. Deleting an absent one is
    /// `NotFound`.
    fn delete_statement_of_affairs(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: StatementOfAffairsStore> StatementOfAffairsStore for std::sync::Arc<T> {
    fn create_statement_of_affairs(
        &self,
        transaction_id: &str,
        statement: &StatementOfAffairs,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).create_statement_of_affairs(transaction_id, statement)
    }

    fn get_statement_of_affairs(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<StatementOfAffairs>>> + Send {
        (**self).get_statement_of_affairs(transaction_id)
    }

    fn delete_statement_of_affairs(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_statement_of_affairs(transaction_id)
    }
}

/// Statement-of-affairs service.
pub struct StatementOfAffairsService<S, P> {
    store: S,
    profiles: P,
}

impl<S, P> StatementOfAffairsService<S, P>
where
    S: StatementOfAffairsStore,
    P: CompanyProfileApi,
{
    /// Creates the service.
    pub const fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    /// Creates the case's statement of affairs.
    ///
    /// The references must name one or two statement attachments (at most
    /// one director and one liquidator statement); a statement of
    /// concurrence may accompany them but never stand alone.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for structural, date or reference
    /// problems; `NotFound` for a missing case; `Conflict` when a
    /// statement of affairs already exists.
    pub async fn create(
        &self,
        transaction_id: &str,
        request: CreateStatementOfAffairs,
    ) -> AppResult<StatementOfAffairs> {
        let mut missing = MissingFields::new();
        missing
            .check("statement_date", request.statement_date.is_some())
            .check("attachments", request.attachments.is_some());
        missing.into_result()?;

        let (Some(date_raw), Some(attachments)) =
            (request.statement_date, request.attachments)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        let statement_date = parse_filing_date("statement_date", &date_raw)?;

        let Some(case) = self.store.get_case(transaction_id).await? else {
            return Err(AppError::NotFound(format!(
                "no insolvency case found for transaction [{transaction_id}]"
            )));
        };

        if self
            .store
            .get_statement_of_affairs(transaction_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "a statement of affairs already exists for this case".to_string(),
            ));
        }

        self.check_references(transaction_id, &attachments).await?;

        let profile = self.profiles.fetch(&case.company_number).await?;
        validate_filing_window("statement_date", statement_date, profile.date_of_creation)?;

        let statement = StatementOfAffairs::build(statement_date, attachments)?;
        self.store
            .create_statement_of_affairs(transaction_id, &statement)
            .await?;
        tracing::info!(transaction_id, "statement of affairs created");
        Ok(statement)
    }

    async fn check_references(
        &self,
        transaction_id: &str,
        attachment_ids: &[String],
    ) -> AppResult<()> {
        let mut directors = 0usize;
        let mut liquidators = 0usize;
        let mut concurrences = 0usize;

        for attachment_id in attachment_ids {
            let attachment = self
                .store
                .get_attachment(transaction_id, attachment_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "attachment [{attachment_id}] does not exist on this case"
                    ))
                })?;
            match attachment.attachment_type {
                AttachmentType::StatementOfAffairsDirector => directors += 1,
                AttachmentType::StatementOfAffairsLiquidator => liquidators += 1,
                AttachmentType::StatementOfConcurrence => concurrences += 1,
                other => {
                    return Err(AppError::Validation(format!(
                        "attachment [{attachment_id}] of type [{}] cannot be part of a \
                         statement of affairs",
                        other.as_str()
                    )));
                }
            }
        }

        let statements = directors + liquidators;
        if statements == 0 {
            return Err(AppError::Validation(
                "a statement of affairs requires a director or liquidator statement attachment"
                    .to_string(),
            ));
        }
        if directors > 1 || liquidators > 1 {
            return Err(AppError::Validation(
                "a statement of affairs allows at most one statement of each type".to_string(),
            ));
        }
        if concurrences > 1 {
            return Err(AppError::Validation(
                "a statement of affairs allows at most one statement of concurrence".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetches the case's statement of affairs.
    ///
    /// # Errors
    ///
    /// `NotFound` when none exists.
    pub async fn get(&self, transaction_id: &str) -> AppResult<StatementOfAffairs> {
        self.store
            .get_statement_of_affairs(transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("no statement of affairs found on this case".to_string())
            })
    }

    /// Deletes the case's statement of affairs.
    ///
    /// # Errors
    ///
    /// `NotFound` when none exists.
    pub async fn delete(&self, transaction_id: &str) -> AppResult<()> {
        self.store.delete_statement_of_affairs(transaction_id).await?;
        tracing::info!(transaction_id, "statement of affairs deleted");
        Ok(())
    }
}
