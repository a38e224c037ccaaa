//! Resolution, statement-of-affairs and progress-report store
//! implementations.
//!
//! The three sub-resources are embedded on the case row as JSONB, so each
//! create/delete is a single conditional update that also bumps the case
//! etag.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use windup_core::progress_report::{ProgressReport, ProgressReportStore};
use windup_core::resolution::{Resolution, ResolutionStore};
use windup_core::statement_of_affairs::{StatementOfAffairs, StatementOfAffairsStore};
use windup_shared::{AppError, AppResult, types::mint_etag};

use super::{InsolvencyRepository, db_err, decode_column, encode_column};
use crate::entities::cases;

impl InsolvencyRepository {
    async fn write_embedded(
        &self,
        transaction_id: &str,
        column: cases::Column,
        value: Option<serde_json::Value>,
        absent_message: &str,
    ) -> AppResult<()> {
        let mut update = cases::Entity::update_many()
            .col_expr(column, Expr::value(value.clone()))
            .col_expr(cases::Column::Etag, Expr::value(mint_etag()?))
            .col_expr(cases::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(cases::Column::TransactionId.eq(transaction_id));
        if value.is_none() {
            // Deletes only touch a case that actually holds the resource,
            // so an absent one reports not-found instead of succeeding.
            update = update.filter(column.is_not_null());
        }

        let result = update.exec(self.db()).await.map_err(|e| db_err(&e))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(absent_message.to_string()));
        }
        Ok(())
    }

    async fn read_embedded<T: serde::de::DeserializeOwned>(
        &self,
        transaction_id: &str,
        pick: impl FnOnce(&cases::Model) -> Option<serde_json::Value>,
    ) -> AppResult<Option<T>> {
        let row = cases::Entity::find_by_id(transaction_id)
            .one(self.db())
            .await
            .map_err(|e| db_err(&e))?;
        row.as_ref()
            .and_then(pick)
            .map(decode_column)
            .transpose()
    }
}

impl ResolutionStore for InsolvencyRepository {
    async fn create_resolution(
        &self,
        transaction_id: &str,
        resolution: &Resolution,
    ) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::Resolution,
            Some(encode_column(resolution)?),
            &format!("no insolvency case found for transaction [{transaction_id}]"),
        )
        .await
    }

    async fn get_resolution(&self, transaction_id: &str) -> AppResult<Option<Resolution>> {
        self.read_embedded(transaction_id, |row| row.resolution.clone())
            .await
    }

    async fn delete_resolution(&self, transaction_id: &str) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::Resolution,
            None,
            "no resolution found on this case",
        )
        .await
    }
}

impl StatementOfAffairsStore for InsolvencyRepository {
    async fn create_statement_of_affairs(
        &self,
        transaction_id: &str,
        statement: &StatementOfAffairs,
    ) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::StatementOfAffairs,
            Some(encode_column(statement)?),
            &format!("no insolvency case found for transaction [{transaction_id}]"),
        )
        .await
    }

    async fn get_statement_of_affairs(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<StatementOfAffairs>> {
        self.read_embedded(transaction_id, |row| row.statement_of_affairs.clone())
            .await
    }

    async fn delete_statement_of_affairs(&self, transaction_id: &str) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::StatementOfAffairs,
            None,
            "no statement of affairs found on this case",
        )
        .await
    }
}

impl ProgressReportStore for InsolvencyRepository {
    async fn create_progress_report(
        &self,
        transaction_id: &str,
        report: &ProgressReport,
    ) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::ProgressReport,
            Some(encode_column(report)?),
            &format!("no insolvency case found for transaction [{transaction_id}]"),
        )
        .await
    }

    async fn get_progress_report(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<ProgressReport>> {
        self.read_embedded(transaction_id, |row| row.progress_report.clone())
            .await
    }

    async fn delete_progress_report(&self, transaction_id: &str) -> AppResult<()> {
        self.write_embedded(
            transaction_id,
            cases::Column::ProgressReport,
            None,
            "no progress report found on this case",
        )
        .await
    }
}
