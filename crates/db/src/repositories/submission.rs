//! Submission snapshot read.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use windup_core::submission::{CaseSnapshot, SubmissionStore};
use windup_shared::AppResult;

use super::attachment::model_to_attachment;
use super::case::model_to_case;
use super::practitioner::model_to_practitioner;
use super::{InsolvencyRepository, db_err, decode_column};
use crate::entities::{appointments, attachments, cases, practitioners};

impl SubmissionStore for InsolvencyRepository {
    async fn load_snapshot(&self, transaction_id: &str) -> AppResult<Option<CaseSnapshot>> {
        // One transaction for the whole read, so the gate never sees a
        // half-applied aggregate.
        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;

        let Some(case_row) = cases::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await
            .map_err(|e| db_err(&e))?
        else {
            txn.commit().await.map_err(|e| db_err(&e))?;
            return Ok(None);
        };

        let practitioner_rows = practitioners::Entity::find()
            .filter(practitioners::Column::TransactionId.eq(transaction_id))
            .all(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        let appointment_rows = appointments::Entity::find()
            .filter(appointments::Column::TransactionId.eq(transaction_id))
            .all(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        let attachment_rows = attachments::Entity::find()
            .filter(attachments::Column::TransactionId.eq(transaction_id))
            .all(&txn)
            .await
            .map_err(|e| db_err(&e))?;

        txn.commit().await.map_err(|e| db_err(&e))?;

        let mut appointments_by_id: std::collections::HashMap<String, appointments::Model> =
            appointment_rows
                .into_iter()
                .map(|a| (a.practitioner_id.clone(), a))
                .collect();

        let resolution = case_row
            .resolution
            .clone()
            .map(decode_column)
            .transpose()?;
        let statement_of_affairs = case_row
            .statement_of_affairs
            .clone()
            .map(decode_column)
            .transpose()?;
        let progress_report = case_row
            .progress_report
            .clone()
            .map(decode_column)
            .transpose()?;

        let practitioners = practitioner_rows
            .into_iter()
            .map(|model| {
                let appointment = appointments_by_id.remove(&model.id);
                model_to_practitioner(model, appointment)
            })
            .collect::<AppResult<Vec<_>>>()?;
        let attachments = attachment_rows
            .into_iter()
            .map(model_to_attachment)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(CaseSnapshot {
            case: model_to_case(case_row)?,
            practitioners,
            attachments,
            resolution,
            statement_of_affairs,
            progress_report,
        }))
    }
}
