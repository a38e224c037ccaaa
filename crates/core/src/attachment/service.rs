//! Attachment rules: upload, joined metadata, AV-gated download, delete.

use bytes::Bytes;
use windup_shared::{AppError, AppResult};

use super::types::{Attachment, AttachmentDetails, AttachmentStatus, AttachmentType};
use crate::case::CaseStore;
use crate::clients::{AvStatus, FileTransferApi};

/// Forbidden message for a download whose scan is not clean.
pub const DOWNLOAD_NOT_CLEAN_ERROR: &str = "attachment unavailable for download";

/// Store operations the attachment rules need, on top of case reads.
pub trait AttachmentStore: CaseStore {
    /// Records attachment metadata with status `submitted`.
    fn add_attachment(
        &self,
        transaction_id: &str,
        file_id: &str,
        attachment_type: AttachmentType,
    ) -> impl std::future::Future<Output = AppResult<Attachment>> + Send;

    /// Fetches attachment metadata.
    fn get_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Attachment>>> + Send;

    /// Lists the attachments on a case.
    fn list_attachments(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Vec<Attachment>>> + Send;

    /// Deletes attachment metadata. A sub-resource referencing the
    /// attachment is deleted in the same write. Deleting an absent
    /// attachment is `NotFound`.
    fn delete_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Updates an attachment's lifecycle status.
    fn update_attachment_status(
        &self,
        transaction_id: &str,
        attachment_id: &str,
        status: AttachmentStatus,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: AttachmentStore> AttachmentStore for std::sync::Arc<T> {
    fn add_attachment(
        &self,
        transaction_id: &str,
        file_id: &str,
        attachment_type: AttachmentType,
    ) -> impl std::future::Future<Output = AppResult<Attachment>> + Send {
        (**self).add_attachment(transaction_id, file_id, attachment_type)
    }

    fn get_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Attachment>>> + Send {
        (**self).get_attachment(transaction_id, attachment_id)
    }

    fn list_attachments(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Vec<Attachment>>> + Send {
        (**self).list_attachments(transaction_id)
    }

    fn delete_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_attachment(transaction_id, attachment_id)
    }

    fn update_attachment_status(
        &self,
        transaction_id: &str,
        attachment_id: &str,
        status: AttachmentStatus,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).update_attachment_status(transaction_id, attachment_id, status)
    }
}

fn case_not_found(transaction_id: &str) -> AppError {
    AppError::NotFound(format!(
        "no insolvency case found for transaction [{transaction_id}]"
    ))
}

fn attachment_not_found(attachment_id: &str) -> AppError {
    AppError::NotFound(format!("attachment [{attachment_id}] was not found"))
}

/// Attachment service.
pub struct AttachmentService<S, F> {
    store: S,
    files: F,
}

impl<S, F> AttachmentService<S, F>
where
    S: AttachmentStore,
    F: FileTransferApi,
{
    /// Creates the service.
    pub const fn new(store: S, files: F) -> Self {
        Self { store, files }
    }

    /// Uploads an attachment: bytes to the file service, metadata to the
    /// store with status `submitted`.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for an unknown type or a repeated
    /// at-most-one type, `NotFound` for a missing case, and whatever the
    /// file service maps to for upload failures.
    pub async fn upload(
        &self,
        transaction_id: &str,
        attachment_type_raw: &str,
        filename: &str,
        content_type: &str,
        body: Bytes,
    ) -> AppResult<Attachment> {
        let attachment_type = AttachmentType::parse(attachment_type_raw).ok_or_else(|| {
            AppError::Validation(format!(
                "attachment_type [{attachment_type_raw}] is not valid for this case"
            ))
        })?;

        if self.store.get_case(transaction_id).await?.is_none() {
            return Err(case_not_found(transaction_id));
        }

        if attachment_type.is_unique_per_case() {
            let existing = self.store.list_attachments(transaction_id).await?;
            if existing
                .iter()
                .any(|a| a.attachment_type == attachment_type)
            {
                return Err(AppError::Validation(format!(
                    "an attachment of type [{}] has already been submitted",
                    attachment_type.as_str()
                )));
            }
        }

        let file_id = self.files.upload(filename, content_type, body).await?;
        let attachment = self
            .store
            .add_attachment(transaction_id, &file_id, attachment_type)
            .await?;
        tracing::info!(
            transaction_id,
            attachment_id = %attachment.id,
            attachment_type = attachment_type.as_str(),
            "attachment submitted"
        );
        Ok(attachment)
    }

    /// Fetches the joined metadata view and refreshes the stored status
    /// from the scan state.
    ///
    /// # Errors
    ///
    /// `NotFound` when the attachment is absent in the store or the file
    /// service.
    pub async fn get_details(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentDetails> {
        let attachment = self
            .store
            .get_attachment(transaction_id, attachment_id)
            .await?
            .ok_or_else(|| attachment_not_found(attachment_id))?;

        let metadata = self.files.metadata(attachment_id).await?;

        let status = AttachmentStatus::from_av(metadata.av_status);
        let status = if attachment.status == AttachmentStatus::Submitted
            && metadata.av_status == AvStatus::NotScanned
        {
            // Stay `submitted` until the scanner picks the file up.
            AttachmentStatus::Submitted
        } else {
            status
        };
        if status != attachment.status {
            self.store
                .update_attachment_status(transaction_id, attachment_id, status)
                .await?;
        }

        Ok(AttachmentDetails {
            id: attachment.id,
            attachment_type: attachment.attachment_type,
            status,
            name: metadata.name,
            size: metadata.size,
            content_type: metadata.content_type,
            links: attachment.links,
        })
    }

    /// Downloads the attachment bytes. Only a clean scan may be served.
    ///
    /// # Errors
    ///
    /// `NotFound` when the attachment is absent; `Forbidden` when the scan
    /// state is anything but clean.
    pub async fn download(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> AppResult<(Bytes, String, String)> {
        if self
            .store
            .get_attachment(transaction_id, attachment_id)
            .await?
            .is_none()
        {
            return Err(attachment_not_found(attachment_id));
        }

        let metadata = self.files.metadata(attachment_id).await?;
        if metadata.av_status != AvStatus::Clean {
            tracing::warn!(
                transaction_id,
                attachment_id,
                av_status = metadata.av_status.as_str(),
                "download refused"
            );
            return Err(AppError::Forbidden(DOWNLOAD_NOT_CLEAN_ERROR.to_string()));
        }

        let body = self.files.download(attachment_id).await?;
        Ok((body, metadata.content_type, metadata.name))
    }

    /// Deletes an attachment: file service first, then metadata. A
    /// sub-resource referencing the attachment goes with it.
    ///
    /// # Errors
    ///
    /// `NotFound` when the attachment is absent; the delete never creates
    /// state.
    pub async fn delete(&self, transaction_id: &str, attachment_id: &str) -> AppResult<()> {
        if self
            .store
            .get_attachment(transaction_id, attachment_id)
            .await?
            .is_none()
        {
            return Err(attachment_not_found(attachment_id));
        }

        self.files.delete(attachment_id).await?;
        self.store
            .delete_attachment(transaction_id, attachment_id)
            .await?;
        tracing::info!(transaction_id, attachment_id, "attachment deleted");
        Ok(())
    }

}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory store and file-service fakes shared by the sub-resource
    //! service tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;
    use windup_shared::{AppError, AppResult};

    use crate::attachment::types::{
        Attachment, AttachmentLinks, AttachmentStatus, AttachmentType,
    };
    use crate::case::{CaseStore, CaseType, InsolvencyCase};
    use crate::clients::{AvStatus, FileMetadata, FileTransferApi};
    use crate::links;
    use crate::progress_report::{ProgressReport, ProgressReportStore};
    use crate::resolution::{Resolution, ResolutionStore};
    use crate::statement_of_affairs::{StatementOfAffairs, StatementOfAffairsStore};

    use super::AttachmentStore;

    /// In-memory case store covering every store trait the services need.
    #[derive(Default)]
    pub struct MemoryStore {
        pub cases: Mutex<HashMap<String, InsolvencyCase>>,
        pub attachments: Mutex<HashMap<(String, String), Attachment>>,
        pub resolutions: Mutex<HashMap<String, Resolution>>,
        pub statements: Mutex<HashMap<String, StatementOfAffairs>>,
        pub progress_reports: Mutex<HashMap<String, ProgressReport>>,
    }

    impl MemoryStore {
        /// A store holding one empty case for the transaction.
        pub fn with_case(transaction_id: &str) -> Self {
            let store = Self::default();
            let case = InsolvencyCase::build(
                transaction_id,
                CaseType::CreditorsVoluntaryLiquidation,
                "01234567".to_string(),
                "companyName".to_string(),
            )
            .unwrap();
            store
                .cases
                .lock()
                .unwrap()
                .insert(transaction_id.to_string(), case);
            store
        }
    }

    impl CaseStore for MemoryStore {
        async fn create_case(&self, case: &InsolvencyCase) -> AppResult<()> {
            self.cases
                .lock()
                .unwrap()
                .insert(case.transaction_id.clone(), case.clone());
            Ok(())
        }

        async fn get_case(&self, transaction_id: &str) -> AppResult<Option<InsolvencyCase>> {
            Ok(self.cases.lock().unwrap().get(transaction_id).cloned())
        }
    }

    impl AttachmentStore for MemoryStore {
        async fn add_attachment(
            &self,
            transaction_id: &str,
            file_id: &str,
            attachment_type: AttachmentType,
        ) -> AppResult<Attachment> {
            let attachment = Attachment {
                id: file_id.to_string(),
                attachment_type,
                status: AttachmentStatus::Submitted,
                links: AttachmentLinks {
                    this: links::attachment(transaction_id, file_id),
                    download: links::attachment_download(transaction_id, file_id),
                },
            };
            self.attachments.lock().unwrap().insert(
                (transaction_id.to_string(), file_id.to_string()),
                attachment.clone(),
            );
            Ok(attachment)
        }

        async fn get_attachment(
            &self,
            transaction_id: &str,
            attachment_id: &str,
        ) -> AppResult<Option<Attachment>> {
            Ok(self
                .attachments
                .lock()
                .unwrap()
                .get(&(transaction_id.to_string(), attachment_id.to_string()))
                .cloned())
        }

        async fn list_attachments(&self, transaction_id: &str) -> AppResult<Vec<Attachment>> {
            Ok(self
                .attachments
                .lock()
                .unwrap()
                .iter()
                .filter(|((tid, _), _)| tid == transaction_id)
                .map(|(_, a)| a.clone())
                .collect())
        }

        async fn delete_attachment(
            &self,
            transaction_id: &str,
            attachment_id: &str,
        ) -> AppResult<()> {
            self.attachments
                .lock()
                .unwrap()
                .remove(&(transaction_id.to_string(), attachment_id.to_string()))
                .ok_or_else(|| {
                    AppError::NotFound(format!("attachment [{attachment_id}] was not found"))
                })?;

            // Cascade: a sub-resource referencing the attachment goes too.
            let id = attachment_id.to_string();
            let mut resolutions = self.resolutions.lock().unwrap();
            if resolutions
                .get(transaction_id)
                .is_some_and(|r| r.attachments.contains(&id))
            {
                resolutions.remove(transaction_id);
            }
            let mut statements = self.statements.lock().unwrap();
            if statements
                .get(transaction_id)
                .is_some_and(|s| s.attachments.contains(&id))
            {
                statements.remove(transaction_id);
            }
            let mut progress_reports = self.progress_reports.lock().unwrap();
            if progress_reports
                .get(transaction_id)
                .is_some_and(|p| p.attachments.contains(&id))
            {
                progress_reports.remove(transaction_id);
            }
            Ok(())
        }

        async fn update_attachment_status(
            &self,
            transaction_id: &str,
            attachment_id: &str,
            status: AttachmentStatus,
        ) -> AppResult<()> {
            let mut attachments = self.attachments.lock().unwrap();
            let attachment = attachments
                .get_mut(&(transaction_id.to_string(), attachment_id.to_string()))
                .ok_or_else(|| {
                    AppError::NotFound(format!("attachment [{attachment_id}] was not found"))
                })?;
            attachment.status = status;
            Ok(())
        }
    }

    impl ResolutionStore for MemoryStore {
        async fn create_resolution(
            &self,
            transaction_id: &str,
            resolution: &Resolution,
        ) -> AppResult<()> {
            self.resolutions
                .lock()
                .unwrap()
                .insert(transaction_id.to_string(), resolution.clone());
            Ok(())
        }

        async fn get_resolution(&self, transaction_id: &str) -> AppResult<Option<Resolution>> {
            Ok(self.resolutions.lock().unwrap().get(transaction_id).cloned())
        }

        async fn delete_resolution(&self, transaction_id: &str) -> AppResult<()> {
            self.resolutions
                .lock()
                .unwrap()
                .remove(transaction_id)
                .map(|_| ())
                .ok_or_else(|| {
                    AppError::NotFound("no resolution found on this case".to_string())
                })
        }
    }

    impl StatementOfAffairsStore for MemoryStore {
        async fn create_statement_of_affairs(
            &self,
            transaction_id: &str,
            statement: &StatementOfAffairs,
        ) -> AppResult<()> {
            self.statements
                .lock()
                .unwrap()
                .insert(transaction_id.to_string(), statement.clone());
            Ok(())
        }

        async fn get_statement_of_affairs(
            &self,
            transaction_id: &str,
        ) -> AppResult<Option<StatementOfAffairs>> {
            Ok(self.statements.lock().unwrap().get(transaction_id).cloned())
        }

        async fn delete_statement_of_affairs(&self, transaction_id: &str) -> AppResult<()> {
            self.statements
                .lock()
                .unwrap()
                .remove(transaction_id)
                .map(|_| ())
                .ok_or_else(|| {
                    AppError::NotFound("no statement of affairs found on this case".to_string())
                })
        }
    }

    impl ProgressReportStore for MemoryStore {
        async fn create_progress_report(
            &self,
            transaction_id: &str,
            report: &ProgressReport,
        ) -> AppResult<()> {
            self.progress_reports
                .lock()
                .unwrap()
                .insert(transaction_id.to_string(), report.clone());
            Ok(())
        }

        async fn get_progress_report(
            &self,
            transaction_id: &str,
        ) -> AppResult<Option<ProgressReport>> {
            Ok(self
                .progress_reports
                .lock()
                .unwrap()
                .get(transaction_id)
                .cloned())
        }

        async fn delete_progress_report(&self, transaction_id: &str) -> AppResult<()> {
            self.progress_reports
                .lock()
                .unwrap()
                .remove(transaction_id)
                .map(|_| ())
                .ok_or_else(|| {
                    AppError::NotFound("no progress report found on this case".to_string())
                })
        }
    }

    /// Company-profile fake with a fixed incorporation date of 2010-06-01.
    pub struct FixedProfiles;

    impl crate::clients::CompanyProfileApi for FixedProfiles {
        async fn fetch(
            &self,
            _company_number: &str,
        ) -> AppResult<crate::clients::CompanyProfile> {
            Ok(crate::clients::CompanyProfile {
                company_name: "companyName".to_string(),
                jurisdiction: "england-wales".to_string(),
                company_status: "active".to_string(),
                company_type: "ltd".to_string(),
                date_of_creation: chrono::NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
            })
        }
    }

    /// In-memory file service; scan states can be primed per file.
    #[derive(Default)]
    pub struct MemoryFileService {
        pub files: Mutex<HashMap<String, FileMetadata>>,
        pub bodies: Mutex<HashMap<String, Bytes>>,
        pub next_id: Mutex<u32>,
    }

    impl MemoryFileService {
        /// Marks a stored file with the given scan state.
        pub fn set_av_status(&self, file_id: &str, av_status: AvStatus) {
            if let Some(meta) = self.files.lock().unwrap().get_mut(file_id) {
                meta.av_status = av_status;
            }
        }
    }

    impl FileTransferApi for MemoryFileService {
        async fn upload(
            &self,
            filename: &str,
            content_type: &str,
            body: Bytes,
        ) -> AppResult<String> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let id = format!("file-{}", *next_id);
            self.files.lock().unwrap().insert(
                id.clone(),
                FileMetadata {
                    id: id.clone(),
                    name: filename.to_string(),
                    size: i64::try_from(body.len()).unwrap_or(i64::MAX),
                    content_type: content_type.to_string(),
                    av_status: AvStatus::Clean,
                },
            );
            self.bodies.lock().unwrap().insert(id.clone(), body);
            Ok(id)
        }

        async fn metadata(&self, file_id: &str) -> AppResult<FileMetadata> {
            self.files
                .lock()
                .unwrap()
                .get(file_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("file [{file_id}] was not found")))
        }

        async fn download(&self, file_id: &str) -> AppResult<Bytes> {
            self.bodies
                .lock()
                .unwrap()
                .get(file_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("file [{file_id}] was not found")))
        }

        async fn delete(&self, file_id: &str) -> AppResult<()> {
            self.files.lock().unwrap().remove(file_id);
            self.bodies.lock().unwrap().remove(file_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{MemoryFileService, MemoryStore};
    use super::*;
    use std::sync::Arc;

    fn service() -> AttachmentService<Arc<MemoryStore>, Arc<MemoryFileService>> {
        AttachmentService::new(
            Arc::new(MemoryStore::with_case("12345678")),
            Arc::new(MemoryFileService::default()),
        )
    }

    #[tokio::test]
    async fn test_upload_records_submitted_metadata() {
        let svc = service();
        let attachment = svc
            .upload(
                "12345678",
                "resolution",
                "resolution.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-"),
            )
            .await
            .unwrap();
        assert_eq!(attachment.status, AttachmentStatus::Submitted);
        assert_eq!(attachment.attachment_type, AttachmentType::Resolution);
        assert_eq!(
            attachment.links.download,
            format!("/transactions/12345678/insolvency/attachments/{}/download", attachment.id)
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_type() {
        let svc = service();
        let err = svc
            .upload(
                "12345678",
                "receipt",
                "x.pdf",
                "application/pdf",
                Bytes::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_upload_rejects_second_unique_type() {
        let svc = service();
        svc.upload(
            "12345678",
            "progress-report",
            "report.pdf",
            "application/pdf",
            Bytes::new(),
        )
        .await
        .unwrap();
        let err = svc
            .upload(
                "12345678",
                "progress-report",
                "report2.pdf",
                "application/pdf",
                Bytes::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_upload_allows_repeated_concurrence() {
        let svc = service();
        svc.upload(
            "12345678",
            "statement-of-concurrence",
            "c1.pdf",
            "application/pdf",
            Bytes::new(),
        )
        .await
        .unwrap();
        svc.upload(
            "12345678",
            "statement-of-concurrence",
            "c2.pdf",
            "application/pdf",
            Bytes::new(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_upload_without_case_is_not_found() {
        let svc = AttachmentService::new(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryFileService::default()),
        );
        let err = svc
            .upload(
                "12345678",
                "resolution",
                "x.pdf",
                "application/pdf",
                Bytes::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_details_join_file_service_metadata() {
        let svc = service();
        let attachment = svc
            .upload(
                "12345678",
                "resolution",
                "resolution.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-1.7"),
            )
            .await
            .unwrap();

        let details = svc.get_details("12345678", &attachment.id).await.unwrap();
        assert_eq!(details.name, "resolution.pdf");
        assert_eq!(details.content_type, "application/pdf");
        assert_eq!(details.size, 8);
        assert_eq!(details.status, AttachmentStatus::Clean);
    }

    #[tokio::test]
    async fn test_download_requires_clean_scan() {
        let svc = service();
        let attachment = svc
            .upload(
                "12345678",
                "resolution",
                "resolution.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-"),
            )
            .await
            .unwrap();

        svc.files
            .set_av_status(&attachment.id, crate::clients::AvStatus::Infected);
        let err = svc.download("12345678", &attachment.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), DOWNLOAD_NOT_CLEAN_ERROR);

        svc.files
            .set_av_status(&attachment.id, crate::clients::AvStatus::Clean);
        let (body, content_type, name) =
            svc.download("12345678", &attachment.id).await.unwrap();
        assert_eq!(&body[..], b"%PDF-".as_slice());
        assert_eq!(content_type, "application/pdf");
        assert_eq!(name, "resolution.pdf");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_nullable() {
        let svc = service();
        let attachment = svc
            .upload(
                "12345678",
                "resolution",
                "resolution.pdf",
                "application/pdf",
                Bytes::new(),
            )
            .await
            .unwrap();

        svc.delete("12345678", &attachment.id).await.unwrap();
        let err = svc.delete("12345678", &attachment.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
