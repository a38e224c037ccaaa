//! Practitioner and appointment store implementation.
//!
//! Creating or deleting a practitioner writes the practitioner row and the
//! case's practitioner link map in one transaction.

use std::collections::BTreeMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use windup_core::links;
use windup_core::practitioner::{
    Appointment, MadeBy, NewPractitionerRecord, PRACTITIONER_KIND, Practitioner,
    PractitionerLinks, PractitionerRole, PractitionerStore,
};
use windup_shared::{AppError, AppResult, types::mint_etag, types::mint_practitioner_id};

use super::{InsolvencyRepository, bump_case_etag, db_err, decode_column, encode_column};
use crate::entities::{appointments, cases, practitioners};

const ID_MINT_ATTEMPTS: usize = 3;

pub(crate) fn model_to_appointment(model: appointments::Model) -> AppResult<Appointment> {
    let made_by = MadeBy::parse(&model.made_by).ok_or_else(|| {
        AppError::internal(format!(
            "stored appointment has unknown made_by [{}]",
            model.made_by
        ))
    })?;
    Ok(Appointment {
        appointed_on: model.appointed_on,
        made_by,
        etag: model.etag,
        kind: model.kind,
        links: decode_column(model.links)?,
    })
}

pub(crate) fn model_to_practitioner(
    model: practitioners::Model,
    appointment: Option<appointments::Model>,
) -> AppResult<Practitioner> {
    let role = PractitionerRole::parse(&model.role).ok_or_else(|| {
        AppError::internal(format!("stored practitioner has unknown role [{}]", model.role))
    })?;
    Ok(Practitioner {
        id: model.id,
        ip_code: model.ip_code,
        first_name: model.first_name,
        last_name: model.last_name,
        telephone_number: model.telephone_number,
        email: model.email,
        address: decode_column(model.address)?,
        role,
        appointment: appointment.map(model_to_appointment).transpose()?,
        etag: model.etag,
        kind: model.kind,
        links: decode_column(model.links)?,
    })
}

async fn find_appointment<C: sea_orm::ConnectionTrait>(
    conn: &C,
    transaction_id: &str,
    practitioner_id: &str,
) -> AppResult<Option<appointments::Model>> {
    appointments::Entity::find_by_id((
        transaction_id.to_string(),
        practitioner_id.to_string(),
    ))
    .one(conn)
    .await
    .map_err(|e| db_err(&e))
}

/// Rewrites the case's practitioner link map inside the caller's
/// transaction, bumping the case etag with it.
async fn write_link_map<C: sea_orm::ConnectionTrait>(
    conn: &C,
    transaction_id: &str,
    mutate: impl FnOnce(&mut BTreeMap<String, String>),
) -> AppResult<()> {
    let case_row = cases::Entity::find_by_id(transaction_id)
        .one(conn)
        .await
        .map_err(|e| db_err(&e))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no insolvency case found for transaction [{transaction_id}]"
            ))
        })?;

    let mut map: BTreeMap<String, String> = decode_column(case_row.practitioner_links)?;
    mutate(&mut map);

    cases::Entity::update_many()
        .col_expr(cases::Column::PractitionerLinks, Expr::value(encode_column(&map)?))
        .col_expr(cases::Column::Etag, Expr::value(mint_etag()?))
        .col_expr(cases::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(cases::Column::TransactionId.eq(transaction_id))
        .exec(conn)
        .await
        .map_err(|e| db_err(&e))?;
    Ok(())
}

impl PractitionerStore for InsolvencyRepository {
    async fn create_practitioner(
        &self,
        transaction_id: &str,
        record: NewPractitionerRecord,
    ) -> AppResult<Practitioner> {
        // The minted id is random; an id collision inside a case is
        // possible, so the unique index gets a fresh mint and another go.
        for _ in 0..ID_MINT_ATTEMPTS {
            let id = mint_practitioner_id();
            let practitioner = Practitioner {
                links: PractitionerLinks {
                    this: links::practitioner(transaction_id, &id),
                    appointment: None,
                },
                id: id.clone(),
                ip_code: record.ip_code.clone(),
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                telephone_number: record.telephone_number.clone(),
                email: record.email.clone(),
                address: record.address.clone(),
                role: record.role,
                appointment: None,
                etag: mint_etag()?,
                kind: PRACTITIONER_KIND.to_string(),
            };

            let model = practitioners::ActiveModel {
                transaction_id: Set(transaction_id.to_string()),
                id: Set(id.clone()),
                ip_code: Set(practitioner.ip_code.clone()),
                first_name: Set(practitioner.first_name.clone()),
                last_name: Set(practitioner.last_name.clone()),
                telephone_number: Set(practitioner.telephone_number.clone()),
                email: Set(practitioner.email.clone()),
                address: Set(encode_column(&practitioner.address)?),
                role: Set(practitioner.role.as_str().to_string()),
                etag: Set(practitioner.etag.clone()),
                kind: Set(practitioner.kind.clone()),
                links: Set(encode_column(&practitioner.links)?),
                created_at: Set(chrono::Utc::now().into()),
            };

            let txn = self.db().begin().await.map_err(|e| db_err(&e))?;
            match model.insert(&txn).await {
                Ok(_) => {
                    let self_link = practitioner.links.this.clone();
                    write_link_map(&txn, transaction_id, |map| {
                        map.insert(id, self_link);
                    })
                    .await?;
                    txn.commit().await.map_err(|e| db_err(&e))?;
                    return Ok(practitioner);
                }
                Err(e) => {
                    txn.rollback().await.map_err(|e| db_err(&e))?;
                    match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(detail))
                            if detail.contains("ip_code") =>
                        {
                            return Err(AppError::Conflict(format!(
                                "a practitioner with ip_code [{}] already exists on this case",
                                record.ip_code
                            )));
                        }
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            // id collision; mint again
                        }
                        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                            return Err(AppError::NotFound(format!(
                                "no insolvency case found for transaction [{transaction_id}]"
                            )));
                        }
                        _ => return Err(db_err(&e)),
                    }
                }
            }
        }
        Err(AppError::Internal(
            "practitioner id minting exhausted its retries".to_string(),
        ))
    }

    async fn get_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<Option<Practitioner>> {
        let model = practitioners::Entity::find_by_id((
            transaction_id.to_string(),
            practitioner_id.to_string(),
        ))
        .one(self.db())
        .await
        .map_err(|e| db_err(&e))?;

        let Some(model) = model else {
            return Ok(None);
        };
        let appointment = find_appointment(self.db(), transaction_id, practitioner_id).await?;
        Ok(Some(model_to_practitioner(model, appointment)?))
    }

    async fn list_practitioners(&self, transaction_id: &str) -> AppResult<Vec<Practitioner>> {
        let rows = practitioners::Entity::find()
            .filter(practitioners::Column::TransactionId.eq(transaction_id))
            .all(self.db())
            .await
            .map_err(|e| db_err(&e))?;
        let appointment_rows = appointments::Entity::find()
            .filter(appointments::Column::TransactionId.eq(transaction_id))
            .all(self.db())
            .await
            .map_err(|e| db_err(&e))?;

        let mut appointments_by_id: std::collections::HashMap<String, appointments::Model> =
            appointment_rows
                .into_iter()
                .map(|a| (a.practitioner_id.clone(), a))
                .collect();

        rows.into_iter()
            .map(|model| {
                let appointment = appointments_by_id.remove(&model.id);
                model_to_practitioner(model, appointment)
            })
            .collect()
    }

    async fn delete_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<()> {
        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;

        // The appointment row cascades with the practitioner row.
        let result = practitioners::Entity::delete_many()
            .filter(practitioners::Column::TransactionId.eq(transaction_id))
            .filter(practitioners::Column::Id.eq(practitioner_id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        if result.rows_affected == 0 {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return Err(AppError::NotFound(format!(
                "practitioner [{practitioner_id}] was not found"
            )));
        }

        write_link_map(&txn, transaction_id, |map| {
            map.remove(practitioner_id);
        })
        .await?;
        txn.commit().await.map_err(|e| db_err(&e))
    }

    async fn set_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        appointment: &Appointment,
    ) -> AppResult<()> {
        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;

        let Some(practitioner_row) = practitioners::Entity::find_by_id((
            transaction_id.to_string(),
            practitioner_id.to_string(),
        ))
        .one(&txn)
        .await
        .map_err(|e| db_err(&e))?
        else {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return Err(AppError::NotFound(format!(
                "practitioner [{practitioner_id}] was not found"
            )));
        };

        // Replace semantics: drop any previous appointment row first.
        appointments::Entity::delete_many()
            .filter(appointments::Column::TransactionId.eq(transaction_id))
            .filter(appointments::Column::PractitionerId.eq(practitioner_id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;

        let model = appointments::ActiveModel {
            transaction_id: Set(transaction_id.to_string()),
            practitioner_id: Set(practitioner_id.to_string()),
            appointed_on: Set(appointment.appointed_on),
            made_by: Set(appointment.made_by.as_str().to_string()),
            etag: Set(appointment.etag.clone()),
            kind: Set(appointment.kind.clone()),
            links: Set(encode_column(&appointment.links)?),
            created_at: Set(chrono::Utc::now().into()),
        };
        model.insert(&txn).await.map_err(|e| db_err(&e))?;

        // The practitioner gains the appointment link and a fresh etag.
        let mut practitioner_links: PractitionerLinks =
            decode_column(practitioner_row.links.clone())?;
        practitioner_links.appointment = Some(appointment.links.this.clone());
        let mut active: practitioners::ActiveModel = practitioner_row.into();
        active.links = Set(encode_column(&practitioner_links)?);
        active.etag = Set(mint_etag()?);
        active.update(&txn).await.map_err(|e| db_err(&e))?;

        bump_case_etag(&txn, transaction_id).await?;
        txn.commit().await.map_err(|e| db_err(&e))
    }

    async fn get_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<Option<Appointment>> {
        find_appointment(self.db(), transaction_id, practitioner_id)
            .await?
            .map(model_to_appointment)
            .transpose()
    }

    async fn delete_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        etag: &str,
    ) -> AppResult<()> {
        let txn = self.db().begin().await.map_err(|e| db_err(&e))?;

        let Some(appointment_row) =
            find_appointment(&txn, transaction_id, practitioner_id).await?
        else {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return Err(AppError::NotFound(format!(
                "practitioner [{practitioner_id}] has no appointment"
            )));
        };
        if appointment_row.etag != etag {
            txn.rollback().await.map_err(|e| db_err(&e))?;
            return Err(AppError::PreconditionFailed(
                "appointment etag does not match".to_string(),
            ));
        }

        appointments::Entity::delete_many()
            .filter(appointments::Column::TransactionId.eq(transaction_id))
            .filter(appointments::Column::PractitionerId.eq(practitioner_id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;

        if let Some(practitioner_row) = practitioners::Entity::find_by_id((
            transaction_id.to_string(),
            practitioner_id.to_string(),
        ))
        .one(&txn)
        .await
        .map_err(|e| db_err(&e))?
        {
            let mut practitioner_links: PractitionerLinks =
                decode_column(practitioner_row.links.clone())?;
            practitioner_links.appointment = None;
            let mut active: practitioners::ActiveModel = practitioner_row.into();
            active.links = Set(encode_column(&practitioner_links)?);
            active.etag = Set(mint_etag()?);
            active.update(&txn).await.map_err(|e| db_err(&e))?;
        }

        bump_case_etag(&txn, transaction_id).await?;
        txn.commit().await.map_err(|e| db_err(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windup_core::practitioner::Address;

    #[test]
    fn test_practitioner_row_round_trip() {
        let address = Address {
            address_line_1: "1".to_string(),
            locality: "x".to_string(),
            ..Address::default()
        };
        let model = practitioners::Model {
            transaction_id: "12345678".to_string(),
            id: "AB12345678".to_string(),
            ip_code: "1234".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            telephone_number: None,
            email: Some("a@b".to_string()),
            address: serde_json::to_value(&address).unwrap(),
            role: "final-liquidator".to_string(),
            etag: "etag".to_string(),
            kind: PRACTITIONER_KIND.to_string(),
            links: serde_json::json!({
                "self": "/transactions/12345678/insolvency/practitioners/AB12345678"
            }),
            created_at: chrono::Utc::now().into(),
        };

        let practitioner = model_to_practitioner(model, None).unwrap();
        assert_eq!(practitioner.role, PractitionerRole::FinalLiquidator);
        assert_eq!(practitioner.address, address);
        assert!(practitioner.appointment.is_none());
    }

    #[test]
    fn test_appointment_row_round_trip() {
        let model = appointments::Model {
            transaction_id: "12345678".to_string(),
            practitioner_id: "AB12345678".to_string(),
            appointed_on: chrono::NaiveDate::from_ymd_opt(2012, 1, 23).unwrap(),
            made_by: "company".to_string(),
            etag: "etag".to_string(),
            kind: "insolvency#appointment".to_string(),
            links: serde_json::json!({
                "self": "/transactions/12345678/insolvency/practitioners/AB12345678/appointment"
            }),
            created_at: chrono::Utc::now().into(),
        };

        let appointment = model_to_appointment(model).unwrap();
        assert_eq!(appointment.made_by, MadeBy::Company);
    }

    #[test]
    fn test_unknown_stored_role_is_internal() {
        let model = practitioners::Model {
            transaction_id: "12345678".to_string(),
            id: "AB12345678".to_string(),
            ip_code: "1234".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            telephone_number: None,
            email: None,
            address: serde_json::json!({"address_line_1": "1", "locality": "x"}),
            role: "astronaut".to_string(),
            etag: "etag".to_string(),
            kind: PRACTITIONER_KIND.to_string(),
            links: serde_json::json!({"self": "x"}),
            created_at: chrono::Utc::now().into(),
        };

        assert_eq!(model_to_practitioner(model, None).unwrap_err().status_code(), 500);
    }
}
