//! Resolution rules.

use windup_shared::{AppError, AppResult};

use super::types::{CreateResolution, Resolution};
use crate::attachment::{AttachmentStore, AttachmentType};
use crate::clients::CompanyProfileApi;
use crate::validation::dates::{parse_filing_date, validate_filing_window};
use crate::validation::fields::MissingFields;

/// Store operations the resolution rules need, on top of case and
/// attachment reads.
pub trait ResolutionStore: AttachmentStore {
    /// Embeds the resolution on the case.
    fn create_resolution(
        &self,
        transaction_id: &str,
        resolution: &Resolution,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Fetches the case's resolution.
    fn get_resolution(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Resolution>>> + Send;

    /// Deletes the case's resolution. Deleting an absent resolution is
    /// `NotFound`.
    fn delete_resolution(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: ResolutionStore> ResolutionStore for std::sync::Arc<T> {
    fn create_resolution(
        &self,
        transaction_id: &str,
        resolution: &Resolution,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).create_resolution(transaction_id, resolution)
    }

    fn get_resolution(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Resolution>>> + Send {
        (**self).get_resolution(transaction_id)
    }

    fn delete_resolution(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_resolution(transaction_id)
    }
}

/// Resolution service.
pub struct ResolutionService<S, P> {
    store: S,
    profiles: P,
}

impl<S, P> ResolutionService<S, P>
where
    S: ResolutionStore,
    P: CompanyProfileApi,
{
    /// Creates the service.
    pub const fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    /// Creates the case's resolution.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for structural problems, a bad date,
    /// or an attachment reference that is absent or of the wrong type;
    /// `NotFound` for a missing case; `Conflict` when a resolution already
    /// exists.
    pub async fn create(
        &self,
        transaction_id: &str,
        request: CreateResolution,
    ) -> AppResult<Resolution> {
        let mut missing = MissingFields::new();
        missing
            .check("date_of_resolution", request.date_of_resolution.is_some())
            .check("attachments", request.attachments.is_some());
        missing.into_result()?;

        let (Some(date_raw), Some(attachments)) =
            (request.date_of_resolution, request.attachments)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        let date_of_resolution = parse_filing_date("date_of_resolution", &date_raw)?;

        let Some(case) = self.store.get_case(transaction_id).await? else {
            return Err(AppError::NotFound(format!(
                "no insolvency case found for transaction [{transaction_id}]"
            )));
        };

        if self.store.get_resolution(transaction_id).await?.is_some() {
            return Err(AppError::Conflict(
                "a resolution already exists for this case".to_string(),
            ));
        }

        let [attachment_id] = attachments.as_slice() else {
            return Err(AppError::Validation(
                "a resolution requires exactly one attachment".to_string(),
            ));
        };
        let attachment = self
            .store
            .get_attachment(transaction_id, attachment_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "attachment [{attachment_id}] does not exist on this case"
                ))
            })?;
        if attachment.attachment_type != AttachmentType::Resolution {
            return Err(AppError::Validation(format!(
                "attachment [{attachment_id}] is not of type [resolution]"
            )));
        }

        let profile = self.profiles.fetch(&case.company_number).await?;
        validate_filing_window(
            "date_of_resolution",
            date_of_resolution,
            profile.date_of_creation,
        )?;

        let resolution = Resolution::build(date_of_resolution, attachments)?;
        self.store
            .create_resolution(transaction_id, &resolution)
            .await?;
        tracing::info!(transaction_id, "resolution created");
        Ok(resolution)
    }

    /// Fetches the case's resolution.
    ///
    /// # Errors
    ///
    /// `NotFound` when no resolution exists.
    pub async fn get(&self, transaction_id: &str) -> AppResult<Resolution> {
        self.store
            .get_resolution(transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("no resolution found on this case".to_string()))
    }

    /// Deletes the case's resolution.
    ///
    /// # Errors
    ///
    /// `NotFound` when no resolution exists.
    pub async fn delete(&self, transaction_id: &str) -> AppResult<()> {
        self.store.delete_resolution(transaction_id).await?;
        tracing::info!(transaction_id, "resolution deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentService;
    use crate::attachment::service::test_support::{
        FixedProfiles, MemoryFileService, MemoryStore,
    };
    use bytes::Bytes;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        files: Arc<MemoryFileService>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(MemoryStore::with_case("12345678")),
                files: Arc::new(MemoryFileService::default()),
            }
        }

        fn resolutions(&self) -> ResolutionService<Arc<MemoryStore>, FixedProfiles> {
            ResolutionService::new(Arc::clone(&self.store), FixedProfiles)
        }

        fn attachments(&self) -> AttachmentService<Arc<MemoryStore>, Arc<MemoryFileService>> {
            AttachmentService::new(Arc::clone(&self.store), Arc::clone(&self.files))
        }

        async fn upload(&self, attachment_type: &str) -> String {
            self.attachments()
                .upload(
                    "12345678",
                    attachment_type,
                    "document.pdf",
                    "application/pdf",
                    Bytes::from_static(b"%PDF-"),
                )
                .await
                .unwrap()
                .id
        }
    }

    fn request(attachment_id: &str) -> CreateResolution {
        CreateResolution {
            date_of_resolution: Some("2012-01-23".to_string()),
            attachments: Some(vec![attachment_id.to_string()]),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        let created = fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap();
        assert_eq!(created.attachments, vec![attachment_id]);
        assert_eq!(created.etag.len(), 56);

        let fetched = fixture.resolutions().get("12345678").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_rejects_wrong_attachment_type() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("statement-of-affairs-director").await;

        let err = fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("resolution"));
    }

    #[tokio::test]
    async fn test_rejects_dangling_attachment_reference() {
        let fixture = Fixture::new();
        let err = fixture
            .resolutions()
            .create("12345678", request("no-such-file"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_rejects_multiple_attachments() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        let err = fixture
            .resolutions()
            .create(
                "12345678",
                CreateResolution {
                    date_of_resolution: Some("2012-01-23".to_string()),
                    attachments: Some(vec![attachment_id.clone(), attachment_id]),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_rejects_second_resolution() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap();
        let err = fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_rejects_date_outside_window() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        let err = fixture
            .resolutions()
            .create(
                "12345678",
                CreateResolution {
                    date_of_resolution: Some("2009-01-01".to_string()),
                    attachments: Some(vec![attachment_id]),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_missing_fields_listed_together() {
        let fixture = Fixture::new();
        let err = fixture
            .resolutions()
            .create("12345678", CreateResolution::default())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("date_of_resolution"));
        assert!(msg.contains("attachments"));
    }

    #[tokio::test]
    async fn test_deleting_referenced_attachment_removes_resolution() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap();
        fixture
            .attachments()
            .delete("12345678", &attachment_id)
            .await
            .unwrap();

        let err = fixture.resolutions().get("12345678").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_nullable() {
        let fixture = Fixture::new();
        let attachment_id = fixture.upload("resolution").await;

        fixture
            .resolutions()
            .create("12345678", request(&attachment_id))
            .await
            .unwrap();
        fixture.resolutions().delete("12345678").await.unwrap();
        let err = fixture.resolutions().delete("12345678").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
