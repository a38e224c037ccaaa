//! Practitioner and appointment rules.

use windup_shared::{AppError, AppResult};

use super::types::{
    AppointPractitioner, Appointment, CreatePractitioner, MadeBy, NewPractitionerRecord,
    Practitioner, PractitionerRole,
};
use crate::case::CaseStore;
use crate::clients::CompanyProfileApi;
use crate::validation::dates::{parse_filing_date, validate_filing_window};
use crate::validation::fields::{MissingFields, validate_name, validate_telephone};

/// The most practitioners a case can carry.
pub const MAX_PRACTITIONERS: usize = 5;

/// Store operations the practitioner rules need, on top of case reads.
///
/// `create_practitioner` mints the practitioner id so it can retry on a
/// collision of the `(transaction_id, id)` unique index; both it and
/// `delete_practitioner` maintain the case's practitioner link map in the
/// same write.
pub trait PractitionerStore: CaseStore {
    /// Inserts a practitioner and links it on the case.
    fn create_practitioner(
        &self,
        transaction_id: &str,
        record: NewPractitionerRecord,
    ) -> impl std::future::Future<Output = AppResult<Practitioner>> + Send;

    /// Fetches a practitioner.
    fn get_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Practitioner>>> + Send;

    /// Lists the practitioners on a case.
    fn list_practitioners(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Vec<Practitioner>>> + Send;

    /// Deletes a practitioner, its appointment and its case link.
    /// Deleting an absent practitioner is `NotFound`.
    fn delete_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Sets or replaces a practitioner's appointment.
    fn set_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        appointment: &Appointment,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;

    /// Fetches a practitioner's appointment.
    fn get_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Appointment>>> + Send;

    /// Deletes an appointment when the supplied etag matches the stored
    /// one; a mismatch is `PreconditionFailed`.
    fn delete_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        etag: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

impl<T: PractitionerStore> PractitionerStore for std::sync::Arc<T> {
    fn create_practitioner(
        &self,
        transaction_id: &str,
        record: NewPractitionerRecord,
    ) -> impl std::future::Future<Output = AppResult<Practitioner>> + Send {
        (**self).create_practitioner(transaction_id, record)
    }

    fn get_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Practitioner>>> + Send {
        (**self).get_practitioner(transaction_id, practitioner_id)
    }

    fn list_practitioners(
        &self,
        transaction_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Vec<Practitioner>>> + Send {
        (**self).list_practitioners(transaction_id)
    }

    fn delete_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_practitioner(transaction_id, practitioner_id)
    }

    fn set_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        appointment: &Appointment,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).set_appointment(transaction_id, practitioner_id, appointment)
    }

    fn get_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> impl std::future::Future<Output = AppResult<Option<Appointment>>> + Send {
        (**self).get_appointment(transaction_id, practitioner_id)
    }

    fn delete_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        etag: &str,
    ) -> impl std::future::Future<Output = AppResult<()>> + Send {
        (**self).delete_appointment(transaction_id, practitioner_id, etag)
    }
}

fn case_not_found(transaction_id: &str) -> AppError {
    AppError::NotFound(format!(
        "no insolvency case found for transaction [{transaction_id}]"
    ))
}

fn practitioner_not_found(practitioner_id: &str) -> AppError {
    AppError::NotFound(format!("practitioner [{practitioner_id}] was not found"))
}

/// Practitioner and appointment service.
pub struct PractitionerService<S, P> {
    store: S,
    profiles: P,
}

impl<S, P> PractitionerService<S, P>
where
    S: PractitionerStore,
    P: CompanyProfileApi,
{
    /// Creates the service.
    pub const fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    /// Creates a practitioner on the case.
    ///
    /// # Errors
    ///
    /// Fails with validation errors for structural or field-shape problems,
    /// `NotFound` when the case is absent, and a validation error when the
    /// case is full or already carries the same `ip_code`.
    pub async fn create_practitioner(
        &self,
        transaction_id: &str,
        request: CreatePractitioner,
    ) -> AppResult<Practitioner> {
        let mut missing = MissingFields::new();
        missing
            .check("ip_code", request.ip_code.is_some())
            .check("first_name", request.first_name.is_some())
            .check("last_name", request.last_name.is_some())
            .check("role", request.role.is_some());
        match &request.address {
            None => {
                missing.check("address", false);
            }
            Some(address) => {
                missing
                    .check("address_line_1", address.address_line_1.is_some())
                    .check("locality", address.locality.is_some());
            }
        }
        missing.into_result()?;

        if request.telephone_number.is_none() && request.email.is_none() {
            return Err(AppError::Validation(
                "either telephone_number or email is required".to_string(),
            ));
        }

        let (Some(ip_code), Some(first_name), Some(last_name), Some(role_raw), Some(address)) = (
            request.ip_code,
            request.first_name,
            request.last_name,
            request.role,
            request.address,
        ) else {
            return Err(AppError::internal("required fields vanished after check"));
        };
        let (Some(address_line_1), Some(locality)) =
            (address.address_line_1, address.locality)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        validate_name("first_name", &first_name)?;
        validate_name("last_name", &last_name)?;
        if let Some(telephone) = &request.telephone_number {
            validate_telephone(telephone)?;
        }
        let role = PractitionerRole::parse(&role_raw).ok_or_else(|| {
            AppError::Validation(format!("role [{role_raw}] is not a practitioner role"))
        })?;

        if self.store.get_case(transaction_id).await?.is_none() {
            return Err(case_not_found(transaction_id));
        }

        let existing = self.store.list_practitioners(transaction_id).await?;
        if existing.len() >= MAX_PRACTITIONERS {
            return Err(AppError::Validation(format!(
                "the case already has the maximum of {MAX_PRACTITIONERS} practitioners"
            )));
        }
        if existing.iter().any(|p| p.ip_code == ip_code) {
            return Err(AppError::Validation(format!(
                "a practitioner with ip_code [{ip_code}] already exists on this case"
            )));
        }

        let record = NewPractitionerRecord {
            ip_code,
            first_name,
            last_name,
            telephone_number: request.telephone_number,
            email: request.email,
            address: super::types::Address {
                premises: address.premises,
                address_line_1,
                address_line_2: address.address_line_2,
                locality,
                region: address.region,
                country: address.country,
                postal_code: address.postal_code,
                po_box: address.po_box,
            },
            role,
        };

        let practitioner = self.store.create_practitioner(transaction_id, record).await?;
        tracing::info!(
            transaction_id,
            practitioner_id = %practitioner.id,
            "practitioner created"
        );
        Ok(practitioner)
    }

    /// Fetches a practitioner.
    ///
    /// # Errors
    ///
    /// `NotFound` when the practitioner is absent.
    pub async fn get_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<Practitioner> {
        self.store
            .get_practitioner(transaction_id, practitioner_id)
            .await?
            .ok_or_else(|| practitioner_not_found(practitioner_id))
    }

    /// Lists the practitioners on a case.
    ///
    /// # Errors
    ///
    /// `NotFound` when the case is absent.
    pub async fn list_practitioners(
        &self,
        transaction_id: &str,
    ) -> AppResult<Vec<Practitioner>> {
        if self.store.get_case(transaction_id).await?.is_none() {
            return Err(case_not_found(transaction_id));
        }
        self.store.list_practitioners(transaction_id).await
    }

    /// Deletes a practitioner, its appointment and its case link.
    ///
    /// # Errors
    ///
    /// `NotFound` when the practitioner is absent; the delete never creates
    /// state.
    pub async fn delete_practitioner(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<()> {
        self.store
            .delete_practitioner(transaction_id, practitioner_id)
            .await?;
        tracing::info!(transaction_id, practitioner_id, "practitioner deleted");
        Ok(())
    }

    /// Appoints a practitioner.
    ///
    /// The date must sit in the incorporation window, every appointment on
    /// a case shares one date, and a practitioner cannot be appointed
    /// twice.
    ///
    /// # Errors
    ///
    /// Fails as described above; absent case or practitioner is `NotFound`.
    pub async fn appoint(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        request: AppointPractitioner,
    ) -> AppResult<Appointment> {
        let mut missing = MissingFields::new();
        missing
            .check("appointed_on", request.appointed_on.is_some())
            .check("made_by", request.made_by.is_some());
        missing.into_result()?;

        let (Some(appointed_on_raw), Some(made_by_raw)) =
            (request.appointed_on, request.made_by)
        else {
            return Err(AppError::internal("required fields vanished after check"));
        };

        let appointed_on = parse_filing_date("appointed_on", &appointed_on_raw)?;
        let made_by = MadeBy::parse(&made_by_raw).ok_or_else(|| {
            AppError::Validation(format!(
                "made_by must be company or creditors, not [{made_by_raw}]"
            ))
        })?;

        let Some(case) = self.store.get_case(transaction_id).await? else {
            return Err(case_not_found(transaction_id));
        };
        let practitioner = self
            .store
            .get_practitioner(transaction_id, practitioner_id)
            .await?
            .ok_or_else(|| practitioner_not_found(practitioner_id))?;

        if practitioner.is_appointed() {
            return Err(AppError::Conflict(format!(
                "practitioner [{practitioner_id}] is already appointed"
            )));
        }

        let profile = self.profiles.fetch(&case.company_number).await?;
        validate_filing_window("appointed_on", appointed_on, profile.date_of_creation)?;

        // Appointments within a case all occur on the same date.
        let practitioners = self.store.list_practitioners(transaction_id).await?;
        if let Some(existing) = practitioners.iter().find_map(|p| p.appointment.as_ref())
            && existing.appointed_on != appointed_on
        {
            return Err(AppError::Validation(format!(
                "appointed_on must match the date of the existing appointments [{}]",
                existing.appointed_on
            )));
        }

        let appointment =
            Appointment::build(transaction_id, practitioner_id, appointed_on, made_by)?;
        self.store
            .set_appointment(transaction_id, practitioner_id, &appointment)
            .await?;
        tracing::info!(transaction_id, practitioner_id, "practitioner appointed");
        Ok(appointment)
    }

    /// Fetches a practitioner's appointment.
    ///
    /// # Errors
    ///
    /// `NotFound` when the practitioner or the appointment is absent.
    pub async fn get_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
    ) -> AppResult<Appointment> {
        self.store
            .get_appointment(transaction_id, practitioner_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "practitioner [{practitioner_id}] has no appointment"
                ))
            })
    }

    /// Deletes a practitioner's appointment, conditional on its etag.
    ///
    /// # Errors
    ///
    /// A missing etag is a validation error; a stale one is
    /// `PreconditionFailed`; an absent appointment is `NotFound`.
    pub async fn delete_appointment(
        &self,
        transaction_id: &str,
        practitioner_id: &str,
        etag: Option<&str>,
    ) -> AppResult<()> {
        let Some(etag) = etag else {
            return Err(AppError::Validation(
                "If-Match header is required to delete an appointment".to_string(),
            ));
        };
        self.store
            .delete_appointment(transaction_id, practitioner_id, etag)
            .await?;
        tracing::info!(transaction_id, practitioner_id, "appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseType, InsolvencyCase};
    use crate::clients::CompanyProfile;
    use crate::links;
    use crate::practitioner::types::{AddressFields, PRACTITIONER_KIND, PractitionerLinks};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use windup_shared::types::{mint_etag, mint_practitioner_id};

    #[derive(Default)]
    struct MockStore {
        cases: Mutex<HashMap<String, InsolvencyCase>>,
        practitioners: Mutex<HashMap<(String, String), Practitioner>>,
    }

    impl MockStore {
        fn with_case(transaction_id: &str) -> Self {
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

    impl CaseStore for MockStore {
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

    impl PractitionerStore for MockStore {
        async fn create_practitioner(
            &self,
            transaction_id: &str,
            record: NewPractitionerRecord,
        ) -> AppResult<Practitioner> {
            let id = mint_practitioner_id();
            let practitioner = Practitioner {
                links: PractitionerLinks {
                    this: links::practitioner(transaction_id, &id),
                    appointment: None,
                },
                id: id.clone(),
                ip_code: record.ip_code,
                first_name: record.first_name,
                last_name: record.last_name,
                telephone_number: record.telephone_number,
                email: record.email,
                address: record.address,
                role: record.role,
                appointment: None,
                etag: mint_etag()?,
                kind: PRACTITIONER_KIND.to_string(),
            };
            self.practitioners.lock().unwrap().insert(
                (transaction_id.to_string(), id),
                practitioner.clone(),
            );
            Ok(practitioner)
        }

        async fn get_practitioner(
            &self,
            transaction_id: &str,
            practitioner_id: &str,
        ) -> AppResult<Option<Practitioner>> {
            Ok(self
                .practitioners
                .lock()
                .unwrap()
                .get(&(transaction_id.to_string(), practitioner_id.to_string()))
                .cloned())
        }

        async fn list_practitioners(
            &self,
            transaction_id: &str,
        ) -> AppResult<Vec<Practitioner>> {
            Ok(self
                .practitioners
                .lock()
                .unwrap()
                .iter()
                .filter(|((tid, _), _)| tid == transaction_id)
                .map(|(_, p)| p.clone())
                .collect())
        }

        async fn delete_practitioner(
            &self,
            transaction_id: &str,
            practitioner_id: &str,
        ) -> AppResult<()> {
            self.practitioners
                .lock()
                .unwrap()
                .remove(&(transaction_id.to_string(), practitioner_id.to_string()))
                .map(|_| ())
                .ok_or_else(|| practitioner_not_found(practitioner_id))
        }

        async fn set_appointment(
            &self,
            transaction_id: &str,
            practitioner_id: &str,
            appointment: &Appointment,
        ) -> AppResult<()> {
            let mut practitioners = self.practitioners.lock().unwrap();
            let practitioner = practitioners
                .get_mut(&(transaction_id.to_string(), practitioner_id.to_string()))
                .ok_or_else(|| practitioner_not_found(practitioner_id))?;
            practitioner.appointment = Some(appointment.clone());
            practitioner.links.appointment = Some(appointment.links.this.clone());
            Ok(())
        }

        async fn get_appointment(
            &self,
            transaction_id: &str,
            practitioner_id: &str,
        ) -> AppResult<Option<Appointment>> {
            Ok(self
                .practitioners
                .lock()
                .unwrap()
                .get(&(transaction_id.to_string(), practitioner_id.to_string()))
                .and_then(|p| p.appointment.clone()))
        }

        async fn delete_appointment(
            &self,
            transaction_id: &str,
            practitioner_id: &str,
            etag: &str,
        ) -> AppResult<()> {
            let mut practitioners = self.practitioners.lock().unwrap();
            let practitioner = practitioners
                .get_mut(&(transaction_id.to_string(), practitioner_id.to_string()))
                .ok_or_else(|| practitioner_not_found(practitioner_id))?;
            match &practitioner.appointment {
                None => Err(AppError::NotFound(format!(
                    "practitioner [{practitioner_id}] has no appointment"
                ))),
                Some(appointment) if appointment.etag != etag => {
                    Err(AppError::PreconditionFailed(
                        "appointment etag does not match".to_string(),
                    ))
                }
                Some(_) => {
                    practitioner.appointment = None;
                    practitioner.links.appointment = None;
                    Ok(())
                }
            }
        }
    }

    struct MockProfiles;

    impl CompanyProfileApi for MockProfiles {
        async fn fetch(&self, _company_number: &str) -> AppResult<CompanyProfile> {
            Ok(CompanyProfile {
                company_name: "companyName".to_string(),
                jurisdiction: "england-wales".to_string(),
                company_status: "active".to_string(),
                company_type: "ltd".to_string(),
                date_of_creation: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
            })
        }
    }

    fn request(ip_code: &str) -> CreatePractitioner {
        CreatePractitioner {
            ip_code: Some(ip_code.to_string()),
            first_name: Some("First".to_string()),
            last_name: Some("Last".to_string()),
            telephone_number: None,
            email: Some("a@b".to_string()),
            address: Some(AddressFields {
                address_line_1: Some("1".to_string()),
                locality: Some("x".to_string()),
                ..AddressFields::default()
            }),
            role: Some("final-liquidator".to_string()),
        }
    }

    fn appoint_request(date: &str) -> AppointPractitioner {
        AppointPractitioner {
            appointed_on: Some(date.to_string()),
            made_by: Some("company".to_string()),
        }
    }

    fn service() -> PractitionerService<MockStore, MockProfiles> {
        PractitionerService::new(MockStore::with_case("12345678"), MockProfiles)
    }

    #[tokio::test]
    async fn test_create_mints_well_formed_id() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        assert!(windup_shared::types::is_valid_practitioner_id(&practitioner.id));
        assert_eq!(practitioner.role, PractitionerRole::FinalLiquidator);
        assert_eq!(
            practitioner.links.this,
            links::practitioner("12345678", &practitioner.id)
        );
    }

    #[tokio::test]
    async fn test_create_round_trips_through_get() {
        let svc = service();
        let created = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let fetched = svc.get_practitioner("12345678", &created.id).await.unwrap();
        assert_eq!(fetched.ip_code, created.ip_code);
        assert_eq!(fetched.first_name, "First");
        assert_eq!(fetched.email.as_deref(), Some("a@b"));
    }

    #[tokio::test]
    async fn test_create_requires_contact_details_listing_both() {
        let svc = service();
        let err = svc
            .create_practitioner(
                "12345678",
                CreatePractitioner {
                    telephone_number: None,
                    email: None,
                    ..request("1234")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        let msg = err.to_string();
        assert!(msg.contains("telephone_number"));
        assert!(msg.contains("email"));
    }

    #[tokio::test]
    async fn test_create_reports_missing_fields_by_wire_name() {
        let svc = service();
        let err = svc
            .create_practitioner("12345678", CreatePractitioner::default())
            .await
            .unwrap_err();
        let msg = err.to_string();
        for field in ["ip_code", "first_name", "last_name", "role", "address"] {
            assert!(msg.contains(field), "{msg} should name {field}");
        }
    }

    #[tokio::test]
    async fn test_create_reports_missing_address_parts() {
        let svc = service();
        let err = svc
            .create_practitioner(
                "12345678",
                CreatePractitioner {
                    address: Some(AddressFields::default()),
                    ..request("1234")
                },
            )
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("address_line_1"));
        assert!(msg.contains("locality"));
    }

    #[tokio::test]
    async fn test_create_validates_telephone_shape() {
        let svc = service();
        let err = svc
            .create_practitioner(
                "12345678",
                CreatePractitioner {
                    telephone_number: Some("07123 45678".to_string()),
                    ..request("1234")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_role() {
        let svc = service();
        let err = svc
            .create_practitioner(
                "12345678",
                CreatePractitioner {
                    role: Some("liquidator".to_string()),
                    ..request("1234")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_without_case_is_not_found() {
        let svc = PractitionerService::new(MockStore::default(), MockProfiles);
        let err = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_sixth_practitioner_rejected() {
        let svc = service();
        for i in 0..5 {
            svc.create_practitioner("12345678", request(&format!("{i}")))
                .await
                .unwrap();
        }
        let err = svc
            .create_practitioner("12345678", request("5"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains('5'));
    }

    #[tokio::test]
    async fn test_duplicate_ip_code_rejected() {
        let svc = service();
        svc.create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let err = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("1234"));
    }

    #[tokio::test]
    async fn test_delete_practitioner_is_idempotent_nullable() {
        let svc = service();
        let created = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        svc.delete_practitioner("12345678", &created.id).await.unwrap();
        let err = svc
            .delete_practitioner("12345678", &created.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_appoint_happy_path() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let appointment = svc
            .appoint("12345678", &practitioner.id, appoint_request("2012-01-23"))
            .await
            .unwrap();
        assert_eq!(appointment.made_by, MadeBy::Company);
        assert_eq!(
            appointment.appointed_on,
            NaiveDate::from_ymd_opt(2012, 1, 23).unwrap()
        );

        let fetched = svc
            .get_appointment("12345678", &practitioner.id)
            .await
            .unwrap();
        assert_eq!(fetched, appointment);
    }

    #[tokio::test]
    async fn test_appoint_rejects_future_date() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let future = (crate::validation::dates::today() + chrono::Days::new(1))
            .format("%Y-%m-%d")
            .to_string();
        let err = svc
            .appoint("12345678", &practitioner.id, appoint_request(&future))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_appoint_rejects_pre_incorporation_date() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let err = svc
            .appoint("12345678", &practitioner.id, appoint_request("2009-12-31"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_second_appointment_must_share_the_date() {
        let svc = service();
        let first = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let second = svc
            .create_practitioner("12345678", request("5678"))
            .await
            .unwrap();

        svc.appoint("12345678", &first.id, appoint_request("2012-01-23"))
            .await
            .unwrap();
        let err = svc
            .appoint("12345678", &second.id, appoint_request("2012-01-24"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        svc.appoint("12345678", &second.id, appoint_request("2012-01-23"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deleting_the_appointed_practitioner_frees_the_date() {
        let svc = service();
        let first = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let second = svc
            .create_practitioner("12345678", request("5678"))
            .await
            .unwrap();

        svc.appoint("12345678", &first.id, appoint_request("2012-01-23"))
            .await
            .unwrap();
        svc.delete_practitioner("12345678", &first.id).await.unwrap();

        svc.appoint("12345678", &second.id, appoint_request("2012-02-01"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cannot_appoint_twice() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        svc.appoint("12345678", &practitioner.id, appoint_request("2012-01-23"))
            .await
            .unwrap();
        let err = svc
            .appoint("12345678", &practitioner.id, appoint_request("2012-01-23"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_appoint_rejects_unknown_made_by() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let err = svc
            .appoint(
                "12345678",
                &practitioner.id,
                AppointPractitioner {
                    appointed_on: Some("2012-01-23".to_string()),
                    made_by: Some("court".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_delete_appointment_checks_etag() {
        let svc = service();
        let practitioner = svc
            .create_practitioner("12345678", request("1234"))
            .await
            .unwrap();
        let appointment = svc
            .appoint("12345678", &practitioner.id, appoint_request("2012-01-23"))
            .await
            .unwrap();

        let err = svc
            .delete_appointment("12345678", &practitioner.id, Some("stale"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 412);

        let err = svc
            .delete_appointment("12345678", &practitioner.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        svc.delete_appointment("12345678", &practitioner.id, Some(&appointment.etag))
            .await
            .unwrap();
        let err = svc
            .get_appointment("12345678", &practitioner.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
