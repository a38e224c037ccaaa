//! Filing-transaction service client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use windup_shared::{AppError, AppResult};

use super::{build_http_client, transport_error, unexpected_status};

const SERVICE: &str = "transaction service";

/// Lifecycle state of a filing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction accepts updates.
    Open,
    /// Transaction has been closed for submission.
    Closed,
}

/// A filing transaction as the transaction service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: String,
    /// Lifecycle state.
    pub status: TransactionStatus,
}

impl Transaction {
    /// True when the transaction no longer accepts updates.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == TransactionStatus::Closed
    }
}

/// The insolvency resource descriptor patched onto the transaction after a
/// case is created, so the transaction service can find the case and its
/// validation gate.
#[derive(Debug, Clone, Serialize)]
pub struct InsolvencyDescriptor {
    /// Resource kind marker.
    pub kind: String,
    /// Links back into this service.
    pub links: DescriptorLinks,
}

/// Links carried by the insolvency resource descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorLinks {
    /// The case itself.
    #[serde(rename = "self")]
    pub this: String,
    /// The whole-case validation gate.
    pub validation_status: String,
}

/// Operations against the filing-transaction service.
pub trait TransactionsApi: Send + Sync {
    /// Fetches a transaction by id. A missing transaction is `NotFound`.
    fn fetch(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Transaction>> + Send;

    /// Attaches the insolvency resource descriptor to the transaction.
    fn attach_insolvency_resource(
        &self,
        transaction_id: &str,
        descriptor: &InsolvencyDescriptor,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

/// Reqwest-backed transactions client.
#[derive(Debug, Clone)]
pub struct HttpTransactionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransactionsClient {
    /// Creates a client with the given deadline ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl TransactionsApi for HttpTransactionsClient {
    async fn fetch(&self, transaction_id: &str) -> AppResult<Transaction> {
        let url = format!("{}/transactions/{transaction_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            reqwest::StatusCode::OK => response
                .json::<Transaction>()
                .await
                .map_err(|e| transport_error(SERVICE, &e)),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "transaction [{transaction_id}] was not found"
            ))),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }

    async fn attach_insolvency_resource(
        &self,
        transaction_id: &str,
        descriptor: &InsolvencyDescriptor,
    ) -> AppResult<()> {
        let url = format!("{}/private/transactions/{transaction_id}", self.base_url);
        let response = self
            .http
            .patch(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(descriptor)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "transaction [{transaction_id}] was not found"
            ))),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }
}
