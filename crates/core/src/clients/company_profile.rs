//! Company-profile service client.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use windup_shared::{AppError, AppResult};

use super::{build_http_client, transport_error, unexpected_status};

const SERVICE: &str = "company profile service";

/// The slice of a company profile the filing rules consult.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfile {
    /// Registered company name.
    pub company_name: String,
    /// Registration jurisdiction tag.
    pub jurisdiction: String,
    /// Current company status tag.
    pub company_status: String,
    /// Company type tag.
    #[serde(rename = "type")]
    pub company_type: String,
    /// Incorporation date; the lower bound for every resource date on a
    /// case.
    pub date_of_creation: NaiveDate,
}

/// Operations against the company-profile service.
pub trait CompanyProfileApi: Send + Sync {
    /// Fetches the profile for a company number. A missing company is
    /// `NotFound`.
    fn fetch(
        &self,
        company_number: &str,
    ) -> impl std::future::Future<Output = AppResult<CompanyProfile>> + Send;
}

/// Reqwest-backed company-profile client.
#[derive(Debug, Clone)]
pub struct HttpCompanyProfileClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCompanyProfileClient {
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

impl CompanyProfileApi for HttpCompanyProfileClient {
    async fn fetch(&self, company_number: &str) -> AppResult<CompanyProfile> {
        let url = format!("{}/company/{company_number}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            reqwest::StatusCode::OK => response
                .json::<CompanyProfile>()
                .await
                .map_err(|e| transport_error(SERVICE, &e)),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "company [{company_number}] was not found"
            ))),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }
}
