//! Alpha-key name-normalisation client.
//!
//! The alpha key is a canonicalised form of a company name; two names match
//! when their keys are equal, regardless of case and punctuation.

use std::time::Duration;

use serde::Deserialize;
use windup_shared::AppResult;

use super::{build_http_client, transport_error, unexpected_status};

const SERVICE: &str = "alpha key service";

#[derive(Debug, Deserialize)]
struct AlphaKeyResponse {
    same_as_alpha_key: String,
}

/// Operations against the alpha-key service.
pub trait AlphaKeyApi: Send + Sync {
    /// Returns the "same as" key for a company name.
    fn same_as_key(&self, name: &str)
    -> impl std::future::Future<Output = AppResult<String>> + Send;
}

/// Reqwest-backed alpha-key client.
#[derive(Debug, Clone)]
pub struct HttpAlphaKeyClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAlphaKeyClient {
    /// Creates a client with the given deadline ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

impl AlphaKeyApi for HttpAlphaKeyClient {
    async fn same_as_key(&self, name: &str) -> AppResult<String> {
        let url = format!("{}/alphakey", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        if response.status() == reqwest::StatusCode::OK {
            let body: AlphaKeyResponse = response
                .json()
                .await
                .map_err(|e| transport_error(SERVICE, &e))?;
            Ok(body.same_as_alpha_key)
        } else {
            Err(unexpected_status(SERVICE, response.status()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_form() {
        let body: AlphaKeyResponse =
            serde_json::from_str(r#"{"same_as_alpha_key":"COMPANYNAME"}"#).unwrap();
        assert_eq!(body.same_as_alpha_key, "COMPANYNAME");
    }
}
