//! Practitioner and appointment types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use windup_shared::{AppResult, types::mint_etag};

use crate::links;

/// Resource kind marker for a practitioner.
pub const PRACTITIONER_KIND: &str = "insolvency#practitioner";

/// Resource kind marker for an appointment.
pub const APPOINTMENT_KIND: &str = "insolvency#appointment";

/// Roles an insolvency practitioner can hold on a CVL case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PractitionerRole {
    /// Final liquidator.
    FinalLiquidator,
    /// Receiver.
    Receiver,
    /// Receiver manager.
    ReceiverManager,
    /// Proposed liquidator.
    ProposedLiquidator,
    /// Provisional liquidator.
    ProvisionalLiquidator,
    /// Administrative receiver.
    AdministrativeReceiver,
    /// Unspecified practitioner.
    Practitioner,
    /// Interim liquidator.
    InterimLiquidator,
}

impl PractitionerRole {
    /// Wire form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinalLiquidator => "final-liquidator",
            Self::Receiver => "receiver",
            Self::ReceiverManager => "receiver-manager",
            Self::ProposedLiquidator => "proposed-liquidator",
            Self::ProvisionalLiquidator => "provisional-liquidator",
            Self::AdministrativeReceiver => "administrative-receiver",
            Self::Practitioner => "practitioner",
            Self::InterimLiquidator => "interim-liquidator",
        }
    }

    /// Parses the wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "final-liquidator" => Some(Self::FinalLiquidator),
            "receiver" => Some(Self::Receiver),
            "receiver-manager" => Some(Self::ReceiverManager),
            "proposed-liquidator" => Some(Self::ProposedLiquidator),
            "provisional-liquidator" => Some(Self::ProvisionalLiquidator),
            "administrative-receiver" => Some(Self::AdministrativeReceiver),
            "practitioner" => Some(Self::Practitioner),
            "interim-liquidator" => Some(Self::InterimLiquidator),
            _ => None,
        }
    }
}

/// Who made an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MadeBy {
    /// Appointed by the company.
    Company,
    /// Appointed by the creditors.
    Creditors,
}

impl MadeBy {
    /// Wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Creditors => "creditors",
        }
    }

    /// Parses the wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "company" => Some(Self::Company),
            "creditors" => Some(Self::Creditors),
            _ => None,
        }
    }
}

/// A practitioner's address. Premises and the second line are optional on
/// the wire; line one and locality are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Premises.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premises: Option<String>,
    /// First address line.
    pub address_line_1: String,
    /// Second address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// Locality.
    pub locality: String,
    /// Region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Postcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// PO box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_box: Option<String>,
}

/// Links carried by a practitioner resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PractitionerLinks {
    /// The practitioner itself.
    #[serde(rename = "self")]
    pub this: String,
    /// The appointment, once one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<String>,
}

/// An appointment placing a practitioner into post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Date the appointment was made. All appointments on a case share one
    /// date.
    pub appointed_on: NaiveDate,
    /// Who made the appointment.
    pub made_by: MadeBy,
    /// Write-versioning tag; deleting an appointment is conditional on it.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
    /// Appointment links.
    pub links: AppointmentLinks,
}

/// Links carried by an appointment resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentLinks {
    /// The appointment itself.
    #[serde(rename = "self")]
    pub this: String,
}

impl Appointment {
    /// Builds an appointment with a minted etag and canonical link.
    ///
    /// # Errors
    ///
    /// Returns an error if the etag cannot be minted.
    pub fn build(
        transaction_id: &str,
        practitioner_id: &str,
        appointed_on: NaiveDate,
        made_by: MadeBy,
    ) -> AppResult<Self> {
        Ok(Self {
            appointed_on,
            made_by,
            etag: mint_etag()?,
            kind: APPOINTMENT_KIND.to_string(),
            links: AppointmentLinks {
                this: links::appointment(transaction_id, practitioner_id),
            },
        })
    }
}

/// A practitioner proposed or appointed on the case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    /// Minted id, two uppercase letters and eight digits.
    pub id: String,
    /// The practitioner's IP registration code.
    pub ip_code: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact telephone number. At least one of telephone and email is
    /// present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<String>,
    /// Contact email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Address.
    pub address: Address,
    /// Role on the case.
    pub role: PractitionerRole,
    /// The appointment, once made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
    /// Write-versioning tag.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
    /// Practitioner links.
    pub links: PractitionerLinks,
}

impl Practitioner {
    /// True once an appointment has been made.
    #[must_use]
    pub fn is_appointed(&self) -> bool {
        self.appointment.is_some()
    }
}

/// A validated practitioner awaiting an id from the store.
///
/// The store mints the id so it can retry on the (rare) collision its
/// unique index reports.
#[derive(Debug, Clone)]
pub struct NewPractitionerRecord {
    /// IP registration code, unique within the case.
    pub ip_code: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact telephone number.
    pub telephone_number: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Address.
    pub address: Address,
    /// Role on the case.
    pub role: PractitionerRole,
}

/// Request body for creating a practitioner. Every field is optional so
/// missing ones can be reported together by wire name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePractitioner {
    /// IP registration code.
    pub ip_code: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Contact telephone number.
    pub telephone_number: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Address.
    pub address: Option<AddressFields>,
    /// Role wire tag.
    pub role: Option<String>,
}

/// Address as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressFields {
    /// Premises.
    pub premises: Option<String>,
    /// First address line.
    pub address_line_1: Option<String>,
    /// Second address line.
    pub address_line_2: Option<String>,
    /// Locality.
    pub locality: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postcode.
    pub postal_code: Option<String>,
    /// PO box.
    pub po_box: Option<String>,
}

/// Request body for appointing a practitioner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointPractitioner {
    /// Appointment date, `YYYY-MM-DD`.
    pub appointed_on: Option<String>,
    /// Who made the appointment.
    pub made_by: Option<String>,
}
