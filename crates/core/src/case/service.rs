//! Case creation rules.

use windup_shared::{AppError, AppResult};

use super::types::{CASE_KIND, CreateCase, CaseType, DUPLICATE_CASE_ERROR, InsolvencyCase};
use crate::clients::transactions::DescriptorLinks;
use crate::clients::{AlphaKeyApi, CompanyProfileApi, InsolvencyDescriptor, TransactionsApi};
use crate::links;
use crate::validation::fields::MissingFields;

/// Store operations the case rules need.
///
/// Implementations must reject a second case for the same transaction with
/// `Conflict` carrying [`DUPLICATE_CASE_ERROR`].
pub trait CaseStore: Send + Sync {
    /// Inserts a new case.
    fn create_case(
        &self,
        case: &InsolvencyCase,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Fetches a case by transaction id.
    fn get_case(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<InsolvencyCase>>> + Send;
}

impl<T: CaseStore> CaseStore for std::sync::Arc<T> {
    fn create_case(
        &self,
        case: &InsolvencyCase,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).create_case(case)
    }

    fn get_case(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<InsolvencyCase>>> + Send {
        (**self).get_case(transaction_id)
    }
}

/// Case creation service.
pub struct CaseService<S, T, P, K> {
    store: S,
    transactions: T,
    profiles: P,
    alpha_key: K,
}

impl<S, T, P, K> CaseService<S, T, P, K>
where
    S: CaseStore,
    T: TransactionsApi,
    P: CompanyProfileApi,
    K: AlphaKeyApi,
{
    /// Creates the service.
    pub const fn new(store: S, transactions: T, profiles: P, alpha_key: K) -> Self {
        Self {
            store,
            transactions,
            profiles,
            alpha_key,
        }
    }

    /// Creates the insolvency case for a transaction.
    ///
    /// The transaction must exist and be open; the company must exist, its
    /// name must match the supplied one under alpha-key normalisation, and
    /// it must not be restricted from voluntary liquidation. On success the
    /// transaction is patched with the insolvency resource descriptor; a
    /// patch failure is surfaced and the stored case is kept (no
    /// distributed rollback).
    ///
    /// # Errors
    ///
    /// Returns the first failing rule as described above.
    pub async fn create_case(
        &self,
        transaction_id: &str,
        request: CreateCase,
    ) -> AppResult<InsolvencyCase> {
        let mut missing = MissingFields::new();
        missing
            .check("company_number", request.company_number.is_some())
            .check("company_name", request.company_name.is_some())
            .check("case_type", request.case_type.is_some());
        missing.into_result()?;

        let (Some(company_number), Some(company_name), Some(case_type_raw)) =
            (request.company_number, request.company_name, request.case_type)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        let case_type = CaseType::parse(&case_type_raw).ok_or_else(|| {
            AppError::Validation(format!("case_type [{case_type_raw}] is not supported"))
        })?;

        let transaction = self.transactions.fetch(transaction_id).await?;
        if transaction.is_closed() {
            return Err(AppError::Forbidden(format!(
                "transaction [{transaction_id}] is already closed and cannot be updated"
            )));
        }

        let profile = self.profiles.fetch(&company_number).await?;

        let supplied_key = self.alpha_key.same_as_key(&company_name).await?;
        let registered_key = self.alpha_key.same_as_key(&profile.company_name).await?;
        if supplied_key != registered_key {
            return Err(AppError::Validation("company names do not match".to_string()));
        }

        super::types::check_company_restrictions(&profile)?;

        if self.store.get_case(transaction_id).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_CASE_ERROR.to_string()));
        }

        let case =
            InsolvencyCase::build(transaction_id, case_type, company_number, company_name)?;
        self.store.create_case(&case).await?;

        tracing::info!(transaction_id, "insolvency case created");

        let descriptor = InsolvencyDescriptor {
            kind: CASE_KIND.to_string(),
            links: DescriptorLinks {
                this: links::case(transaction_id),
                validation_status: links::validation_status(transaction_id),
            },
        };
        self.transactions
            .attach_insolvency_resource(transaction_id, &descriptor)
            .await?;

        Ok(case)
    }
}
