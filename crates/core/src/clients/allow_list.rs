//! Email allow-list client.

use std::time::Duration;

use windup_shared::AppResult;

use super::{build_http_client, transport_error, unexpected_status};

const SERVICE: &str = "allow list service";

/// Operations against the allow-list service.
pub trait AllowListApi: Send + Sync {
    /// True when the email is on the allow list.
    fn is_allowed(&self, email: &str)
    -> impl std::future::Future<Output = AppResult<bool>> + Send;
}

/// Reqwest-backed allow-list client.
#[derive(Debug, Clone)]
pub struct HttpAllowListClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpAllowListClient {
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

impl AllowListApi for HttpAllowListClient {
    async fn is_allowed(&self, email: &str) -> AppResult<bool> {
        let url = format!(
            "{}/efs-submission-api/company-authentication/allow-list/{email}",
            self.base_url
        );
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        if response.status() == reqwest::StatusCode::OK {
            response
                .json::<bool>()
                .await
                .map_err(|e| transport_error(SERVICE, &e))
        } else {
            Err(unexpected_status(SERVICE, response.status()))
        }
    }
}
