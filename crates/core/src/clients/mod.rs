//! Upstream service clients.
//!
//! One trait per collaborator, so the business rules stay testable against
//! in-memory fakes, and one reqwest implementation per trait, constructed at
//! startup and shared process-wide. Transport failures become dependency
//! errors; an upstream 404 becomes the domain's own not-found.

pub mod allow_list;
pub mod alpha_key;
pub mod company_profile;
pub mod file_transfer;
pub mod transactions;

pub use allow_list::{AllowListApi, HttpAllowListClient};
pub use alpha_key::{AlphaKeyApi, HttpAlphaKeyClient};
pub use company_profile::{CompanyProfile, CompanyProfileApi, HttpCompanyProfileClient};
pub use file_transfer::{AvStatus, FileMetadata, FileTransferApi, HttpFileTransferClient};
pub use transactions::{
    HttpTransactionsClient, InsolvencyDescriptor, Transaction, TransactionStatus, TransactionsApi,
};

use std::time::Duration;

use windup_shared::{AppError, AppResult};

/// Builds a reqwest client with the per-call deadline ceiling.
pub(crate) fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(2))
        .build()
        .map_err(AppError::internal)
}

/// Maps a transport-level failure (connect, timeout, body read) onto a
/// dependency error.
pub(crate) fn transport_error(service: &str, err: &reqwest::Error) -> AppError {
    tracing::error!(service, error = %err, "upstream call failed");
    AppError::Dependency(format!("{service} unavailable"))
}

/// Maps an unexpected upstream status onto a dependency error, logging the
/// status we actually got.
pub(crate) fn unexpected_status(service: &str, status: reqwest::StatusCode) -> AppError {
    tracing::error!(service, status = status.as_u16(), "unexpected upstream status");
    AppError::Dependency(format!("{service} returned an error"))
}
