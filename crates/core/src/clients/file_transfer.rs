//! File-transfer / anti-virus service client.
//!
//! Attachment bytes live in this service; the case store only holds
//! metadata. Every uploaded file is scanned, and its `av_status` gates
//! downloads.

use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use windup_shared::{AppError, AppResult};

use super::{build_http_client, transport_error, unexpected_status};

const SERVICE: &str = "file transfer service";

/// Anti-virus scan state reported by the file service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvStatus {
    /// Scan has not completed yet.
    NotScanned,
    /// File is clean and may be downloaded.
    Clean,
    /// File is infected and must never be served.
    Infected,
}

impl AvStatus {
    /// Wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotScanned => "not-scanned",
            Self::Clean => "clean",
            Self::Infected => "infected",
        }
    }
}

/// File metadata as the file service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    /// File id (also the attachment id in the case store).
    pub id: String,
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub content_type: String,
    /// Anti-virus scan state.
    pub av_status: AvStatus,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Operations against the file-transfer service.
pub trait FileTransferApi: Send + Sync {
    /// Uploads a file and returns the file id.
    fn upload(
        &self,
        filename: &str,
        content_type: &str,
        body: Bytes,
    ) -> impl std::future::Future<Output = AppResult<String>> + Send;

    /// Fetches file metadata. A missing file is `NotFound`.
    fn metadata(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = AppResult<FileMetadata>> + Send;

    /// Downloads the file bytes.
    fn download(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Bytes>> + Send;

    /// Deletes the file. Deleting an already-absent file succeeds.
    fn delete(&self, file_id: &str) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: FileTransferApi> FileTransferApi for std::sync::Arc<T> {
    fn upload(
        &self,
        filename: &str,
        content_type: &str,
        body: Bytes,
    ) -> impl std::future::Future<Output = AppResult<String>> + Send {
        (**self).upload(filename, content_type, body)
    }

    fn metadata(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = AppResult<FileMetadata>> + Send {
        (**self).metadata(file_id)
    }

    fn download(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Bytes>> + Send {
        (**self).download(file_id)
    }

    fn delete(&self, file_id: &str) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete(file_id)
    }
}

/// Reqwest-backed file-transfer client.
///
/// Metadata and delete calls use the short deadline; upload and download use
/// the long one.
#[derive(Debug, Clone)]
pub struct HttpFileTransferClient {
    http: reqwest::Client,
    transfer_http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFileTransferClient {
    /// Creates a client with the given deadline ceilings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP clients cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        transfer_timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            transfer_http: build_http_client(transfer_timeout)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl FileTransferApi for HttpFileTransferClient {
    async fn upload(&self, filename: &str, content_type: &str, body: Bytes) -> AppResult<String> {
        let part = reqwest::multipart::Part::stream(body)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| transport_error(SERVICE, &e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .transfer_http
            .post(&self.base_url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            status if status.is_success() => {
                let body: UploadResponse = response
                    .json()
                    .await
                    .map_err(|e| transport_error(SERVICE, &e))?;
                Ok(body.id)
            }
            status => Err(unexpected_status(SERVICE, status)),
        }
    }

    async fn metadata(&self, file_id: &str) -> AppResult<FileMetadata> {
        let url = format!("{}/{file_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            reqwest::StatusCode::OK => response
                .json::<FileMetadata>()
                .await
                .map_err(|e| transport_error(SERVICE, &e)),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "file [{file_id}] was not found"
            ))),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }

    async fn download(&self, file_id: &str) -> AppResult<Bytes> {
        let url = format!("{}/{file_id}/download", self.base_url);
        let response = self
            .transfer_http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            reqwest::StatusCode::OK => response
                .bytes()
                .await
                .map_err(|e| transport_error(SERVICE, &e)),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "file [{file_id}] was not found"
            ))),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }

    async fn delete(&self, file_id: &str) -> AppResult<()> {
        let url = format!("{}/{file_id}", self.base_url);
        let response = self
            .http
            .delete(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        match response.status() {
            // A file that is already gone counts as deleted.
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Ok(()),
            status => Err(unexpected_status(SERVICE, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_wire_form() {
        let meta: FileMetadata = serde_json::from_str(
            r#"{
                "id": "9c0ccca5",
                "name": "resolution.pdf",
                "size": 2048,
                "content_type": "application/pdf",
                "av_status": "clean"
            }"#,
        )
        .unwrap();
        assert_eq!(meta.av_status, AvStatus::Clean);
    }

    #[test]
    fn test_av_status_round_trip() {
        for status in [AvStatus::NotScanned, AvStatus::Clean, AvStatus::Infected] {
            let json = serde_json::to_string(&status).unwrap();
            let back: AvStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
