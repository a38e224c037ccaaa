//! Attachment store implementation.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use windup_core::attachment::{Attachment, AttachmentLinks, AttachmentStatus, AttachmentStore, AttachmentType};
use windup_core::links;
use windup_shared::{AppError, AppResult, types::mint_etag};

use super::{InsolvencyRepository, bump_case_etag, db_err, decode_column, encode_column};
use crate::entities::{attachments, cases};

pub(crate) fn model_to_attachment(model: attachments::Model) -> AppResult<Attachment> {
    let attachment_type = AttachmentType::parse(&model.attachment_type).ok_or_else(|| {
        AppError::internal(format!(
            "stored attachment has unknown type [{}]",
            model.attachment_type
        ))
    })?;
    let status = AttachmentStatus::parse(&model.status).ok_or_else(|| {
        AppError::internal(format!(
            "stored attachment has unknown status [{}]",
            model.status
        ))
    })?;
    Ok(Attachment {
        id: model.id,
        attachment_type,
        status,
        links: decode_column(model.links)?,
    })
}

/// True when the embedded sub-resource document references the attachment.
fn references(embedded: Option<&serde_json::Value>, attachment_id: &str) -> bool {
    embedded
        .and_then(|doc| doc.get("attachments"))
        .and_then(|ids| ids.as_array())
        .is_some_and(|ids| ids.iter().any(|id| id.as_str() == Some(attachment_id)))
}

impl AttachmentStore for InsolvencyRepository {
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

        let model = attachments::ActiveModel {
            transaction_id: Set(transaction_id.to_string()),
            id: Set(attachment.id.clone()),
            attachment_type: Set(attachment_type.as_str().to_string()),
            status: Set(attachment.status.as_str().to_string()),
            links: Set(encode_column(&attachment.links)?),
            created_at: Set(chrono::Utc::now().into()),
        };

        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;
        if let Err(e) = model.insert(&txn).await {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(AppError::NotFound(format!(
                        "no insolvency case found for transaction [{transaction_id}]"
                    )))
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(format!(
                    "attachment [{file_id}] already exists on this case"
                ))),
                _ => Err(db_err(&e)),
            };
        }
        bump_case_etag(&txn, transaction_id).await?;
        txn.commit().await.map_err(|e| db_err(&e))?;
        Ok(attachment)
    }

    async fn get_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> AppResult<Option<Attachment>> {
        let model = attachments::Entity::find_by_id((
            transaction_id.to_string(),
            attachment_id.to_string(),
        ))
        .one(self.db())
        .await
        .map_err(|e| db_err(&e))?;
        model.map(model_to_attachment).transpose()
    }

    async fn list_attachments(&self, transaction_id: &str) -> AppResult<Vec<Attachment>> {
        let rows = attachments::Entity::find()
            .filter(attachments::Column::TransactionId.eq(transaction_id))
            .all(self.db())
            .await
            .map_err(|e| db_err(&e))?;
        rows.into_iter().map(model_to_attachment).collect()
    }

    async fn delete_attachment(
        &self,
        transaction_id: &str,
        attachment_id: &str,
    ) -> AppResult<()> {
        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;

        let result = attachments::Entity::delete_many()
            .filter(attachments::Column::TransactionId.eq(transaction_id))
            .filter(attachments::Column::Id.eq(attachment_id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        if result.rows_affected == 0 {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return Err(AppError::NotFound(format!(
                "attachment [{attachment_id}] was not found"
            )));
        }

        // A sub-resource referencing the attachment goes in the same write.
        let case_row = cases::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        if let Some(case_row) = case_row {
            let mut update = cases::Entity::update_many()
                .col_expr(cases::Column::Etag, Expr::value(mint_etag()?))
                .col_expr(cases::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                .filter(cases::Column::TransactionId.eq(transaction_id));
            if references(case_row.resolution.as_ref(), attachment_id) {
                update = update.col_expr(
                    cases::Column::Resolution,
                    Expr::value(Option::<serde_json::Value>::None),
                );
            }
            if references(case_row.statement_of_affairs.as_ref(), attachment_id) {
                update = update.col_expr(
                    cases::Column::StatementOfAffairs,
                    Expr::value(Option::<serde_json::Value>::None),
                );
            }
            if references(case_row.progress_report.as_ref(), attachment_id) {
                update = update.col_expr(
                    cases::Column::ProgressReport,
                    Expr::value(Option::<serde_json::Value>::None),
                );
            }
            update.exec(&txn).await.map_err(|e| db_err(&e))?;
        }

        txn.commit().await.map_err(|e| db_err(&e))
    }

    async fn update_attachment_status(
        &self,
        transaction_id: &str,
        attachment_id: &str,
        status: AttachmentStatus,
    ) -> AppResult<()> {
        let result = attachments::Entity::update_many()
            .col_expr(
                attachments::Column::Status,
                Expr::value(status.as_str().to_string()),
            )
            .filter(attachments::Column::TransactionId.eq(transaction_id))
            .filter(attachments::Column::Id.eq(attachment_id))
            .exec(self.db())
            .await
            .map_err(|e| db_err(&e))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "attachment [{attachment_id}] was not found"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_row_round_trip() {
        let model = attachments::Model {
            transaction_id: "12345678".to_string(),
            id: "file-1".to_string(),
            attachment_type: "resolution".to_string(),
            status: "submitted".to_string(),
            links: serde_json::json!({
                "self": "/transactions/12345678/insolvency/attachments/file-1",
                "download": "/transactions/12345678/insolvency/attachments/file-1/download"
            }),
            created_at: chrono::Utc::now().into(),
        };

        let attachment = model_to_attachment(model).unwrap();
        assert_eq!(attachment.attachment_type, AttachmentType::Resolution);
        assert_eq!(attachment.status, AttachmentStatus::Submitted);
    }

    #[test]
    fn test_reference_detection() {
        let resolution = serde_json::json!({
            "date_of_resolution": "2012-01-23",
            "attachments": ["file-1"],
            "etag": "etag",
            "kind": "insolvency#resolution"
        });
        assert!(references(Some(&resolution), "file-1"));
        assert!(!references(Some(&resolution), "file-2"));
        assert!(!references(None, "file-1"));
    }
}
