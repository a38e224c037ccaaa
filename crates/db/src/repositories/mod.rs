//! Repository implementations of the core store traits.
//!
//! One repository owns the whole case aggregate. Writes that touch both a
//! child row and the case header (the practitioner link map, the embedded
//! sub-resources) run in a single database transaction: both land or
//! neither does. Every successful write bumps the case etag.

pub mod attachment;
pub mod case;
pub mod practitioner;
pub mod submission;
pub mod subresources;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use windup_shared::{AppError, AppResult, types::mint_etag};

use crate::entities::cases;

/// Repository for the insolvency case aggregate and its children.
///
/// Implements every store trait the domain services define: case,
/// practitioner, attachment, the three sub-resources, and the submission
/// snapshot read.
#[derive(Debug, Clone)]
pub struct InsolvencyRepository {
    db: DatabaseConnection,
}

impl InsolvencyRepository {
    /// Creates a new repository over a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) const fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Maps a database failure onto an internal error, logging the detail.
pub(crate) fn db_err(err: &DbErr) -> AppError {
    tracing::error!(error = %err, "database operation failed");
    AppError::internal(err)
}

/// Decodes a JSON column into a domain value. Stored documents are always
/// written by this crate, so a decode failure is an internal error.
pub(crate) fn decode_column<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, "stored document failed to decode");
        AppError::internal(e)
    })
}

/// Encodes a domain value into a JSON column.
pub(crate) fn encode_column<T: serde::Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(AppError::internal)
}

/// Bumps the case etag (and `updated_at`) inside the caller's transaction.
/// Every mutation of the aggregate routes through this.
pub(crate) async fn bump_case_etag<C: ConnectionTrait>(
    conn: &C,
    transaction_id: &str,
) -> AppResult<()> {
    let result = cases::Entity::update_many()
        .col_expr(cases::Column::Etag, Expr::value(mint_etag()?))
        .col_expr(cases::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(cases::Column::TransactionId.eq(transaction_id))
        .exec(conn)
        .await
        .map_err(|e| db_err(&e))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "no insolvency case found for transaction [{transaction_id}]"
        )));
    }
    Ok(())
}
