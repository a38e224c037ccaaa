//! Case store implementation.

use sea_orm::{ActiveModelTrait, EntityTrait, Set, SqlErr};
use windup_core::case::{CaseStore, CaseType, DUPLICATE_CASE_ERROR, InsolvencyCase};
use windup_shared::{AppError, AppResult};

use super::{InsolvencyRepository, db_err, decode_column, encode_column};
use crate::entities::cases;

pub(crate) fn model_to_case(model: cases::Model) -> AppResult<InsolvencyCase> {
    let case_type = CaseType::parse(&model.case_type).ok_or_else(|| {
        AppError::internal(format!("stored case has unknown type [{}]", model.case_type))
    })?;
    Ok(InsolvencyCase {
        transaction_id: model.transaction_id,
        case_type,
        company_number: model.company_number,
        company_name: model.company_name,
        etag: model.etag,
        kind: model.kind,
        practitioners: decode_column(model.practitioner_links)?,
        links: decode_column(model.links)?,
    })
}

fn case_to_model(case: &InsolvencyCase) -> AppResult<cases::ActiveModel> {
    let now = chrono::Utc::now();
    Ok(cases::ActiveModel {
        transaction_id: Set(case.transaction_id.clone()),
        case_type: Set(case.case_type.as_str().to_string()),
        company_number: Set(case.company_number.clone()),
        company_name: Set(case.company_name.clone()),
        etag: Set(case.etag.clone()),
        kind: Set(case.kind.clone()),
        practitioner_links: Set(encode_column(&case.practitioners)?),
        resolution: Set(None),
        statement_of_affairs: Set(None),
        progress_report: Set(None),
        links: Set(encode_column(&case.links)?),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    })
}

impl CaseStore for InsolvencyRepository {
    async fn create_case(&self, case: &InsolvencyCase) -> AppResult<()> {
        let model = case_to_model(case)?;
        match model.insert(self.db()).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::Conflict(DUPLICATE_CASE_ERROR.to_string()))
                }
                _ => Err(db_err(&e)),
            },
        }
    }

    async fn get_case(&self, transaction_id: &str) -> AppResult<Option<InsolvencyCase>> {
        let model = cases::Entity::find_by_id(transaction_id)
            .one(self.db())
            .await
            .map_err(|e| db_err(&e))?;
        model.map(model_to_case).transpose()
    }
}
