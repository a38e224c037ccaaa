//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - the insolvency case REST routes
//! - the authorisation interceptors (token permissions, email allow list)
//! - panic recovery and request tracing
//! - domain-to-HTTP error mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use windup_core::clients::{
    HttpAllowListClient, HttpAlphaKeyClient, HttpCompanyProfileClient, HttpFileTransferClient,
    HttpTransactionsClient,
};
use windup_db::InsolvencyRepository;
use windup_shared::{AppConfig, AppResult, config::AuthConfig};

/// Attachment uploads top out at 30 MiB.
const MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

/// Application state shared across handlers.
///
/// Everything here is either a connection pool or a stateless client; both
/// clone cheaply, and nothing in the state may cache case documents across
/// requests.
#[derive(Clone)]
pub struct AppState {
    /// Case store repository.
    pub repository: InsolvencyRepository,
    /// Filing-transaction service client.
    pub transactions: HttpTransactionsClient,
    /// Company-profile service client.
    pub profiles: HttpCompanyProfileClient,
    /// Alpha-key service client.
    pub alpha_key: HttpAlphaKeyClient,
    /// File-transfer service client.
    pub files: HttpFileTransferClient,
    /// Allow-list service client.
    pub allow_list: HttpAllowListClient,
    /// Authorisation toggles.
    pub auth: AuthConfig,
}

impl AppState {
    /// Builds the state from configuration and an established database
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if any upstream client cannot be constructed.
    pub fn build(config: &AppConfig, db: DatabaseConnection) -> AppResult<Self> {
        let services = &config.services;
        let timeout = Duration::from_secs(services.timeout_secs);
        let transfer_timeout = Duration::from_secs(services.upload_timeout_secs);

        Ok(Self {
            repository: InsolvencyRepository::new(db),
            transactions: HttpTransactionsClient::new(
                &services.transactions_url,
                &services.api_key,
                timeout,
            )?,
            profiles: HttpCompanyProfileClient::new(
                &services.company_profile_url,
                &services.api_key,
                timeout,
            )?,
            alpha_key: HttpAlphaKeyClient::new(&services.alpha_key_url, timeout)?,
            files: HttpFileTransferClient::new(
                &services.file_transfer_url,
                &services.api_key,
                timeout,
                transfer_timeout,
            )?,
            allow_list: HttpAllowListClient::new(
                &services.allow_list_url,
                &services.api_key,
                timeout,
            )?,
            auth: config.auth.clone(),
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let insolvency = Router::new()
        .merge(routes::case::routes())
        .merge(routes::practitioners::routes())
        .merge(routes::attachments::routes())
        .merge(routes::resolution::routes())
        .merge(routes::statement_of_affairs::routes())
        .merge(routes::progress_report::routes())
        .merge(routes::validation_status::routes())
        .merge(routes::filings::routes());

    // Interceptor order: token permissions first, then the allow list.
    let protected = Router::new()
        .nest("/transactions/{transaction_id}/insolvency", insolvency)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::allow_list::allow_list_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::permissions::token_permissions_middleware,
        ));

    Router::new()
        .merge(routes::health::routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(middleware::recovery::handle_panic))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
