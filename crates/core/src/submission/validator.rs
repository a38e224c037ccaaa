//! The whole-case validation rules.
//!
//! Pure reads over a case snapshot: every rule is evaluated and every
//! failure reported. Nothing here mutates.

use chrono::NaiveDate;

use super::types::{CaseSnapshot, ValidationError, ValidationStatus};
use crate::attachment::{Attachment, AttachmentStatus, AttachmentType};
use crate::validation::dates::within_incorporation_window;

/// Reported when a case holds neither a practitioner nor a resolution.
pub const EMPTY_CASE_ERROR: &str = "case missing practitioners or resolution";

const CASE_LOCATION: &str = "insolvency case";

/// Validates the whole case against the submission rules.
#[must_use]
pub fn validate_case(snapshot: &CaseSnapshot, incorporated_on: NaiveDate) -> ValidationStatus {
    let mut errors = Vec::new();

    check_filing_substance(snapshot, &mut errors);
    check_appointments(snapshot, incorporated_on, &mut errors);
    check_attachment_scans(snapshot, &mut errors);
    check_resolution(snapshot, incorporated_on, &mut errors);
    check_statement_of_affairs(snapshot, incorporated_on, &mut errors);
    check_progress_report(snapshot, incorporated_on, &mut errors);

    ValidationStatus::from_errors(errors)
}

/// A filing must contain at least a practitioner or a resolution.
fn check_filing_substance(snapshot: &CaseSnapshot, errors: &mut Vec<ValidationError>) {
    if snapshot.practitioners.is_empty() && snapshot.resolution.is_none() {
        errors.push(ValidationError::new(EMPTY_CASE_ERROR, CASE_LOCATION));
    }
}

/// Appointments must share one date inside the incorporation window.
fn check_appointments(
    snapshot: &CaseSnapshot,
    incorporated_on: NaiveDate,
    errors: &mut Vec<ValidationError>,
) {
    let appointments: Vec<_> = snapshot
        .practitioners
        .iter()
        .filter_map(|p| p.appointment.as_ref().map(|a| (p.id.as_str(), a)))
        .collect();

    if let Some((_, first)) = appointments.first() {
        if appointments
            .iter()
            .any(|(_, a)| a.appointed_on != first.appointed_on)
        {
            errors.push(ValidationError::new(
                "appointments on the case do not share the same date",
                "appointment",
            ));
        }
        for (practitioner_id, appointment) in &appointments {
            if !within_incorporation_window(appointment.appointed_on, incorporated_on) {
                errors.push(ValidationError::new(
                    format!(
                        "appointment date for practitioner [{practitioner_id}] is outside the \
                         incorporation window"
                    ),
                    "appointment",
                ));
            }
        }
    }
}

/// Every attachment must have passed virus scanning.
fn check_attachment_scans(snapshot: &CaseSnapshot, errors: &mut Vec<ValidationError>) {
    for attachment in &snapshot.attachments {
        if attachment.status != AttachmentStatus::Clean {
            errors.push(ValidationError::new(
                format!(
                    "attachment [{}] has status [{}] and has not passed virus scanning",
                    attachment.id,
                    attachment.status.as_str()
                ),
                "attachments",
            ));
        }
    }
}

fn find_attachment<'a>(snapshot: &'a CaseSnapshot, id: &str) -> Option<&'a Attachment> {
    snapshot.attachments.iter().find(|a| a.id == id)
}

/// Checks one sub-resource reference: present, matching type, clean scan.
fn check_reference(
    snapshot: &CaseSnapshot,
    attachment_id: &str,
    allowed: &[AttachmentType],
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    match find_attachment(snapshot, attachment_id) {
        None => errors.push(ValidationError::new(
            format!("referenced attachment [{attachment_id}] no longer exists"),
            location.to_string(),
        )),
        Some(attachment) => {
            if !allowed.contains(&attachment.attachment_type) {
                errors.push(ValidationError::new(
                    format!(
                        "referenced attachment [{attachment_id}] has the wrong type [{}]",
                        attachment.attachment_type.as_str()
                    ),
                    location.to_string(),
                ));
            }
            if attachment.status != AttachmentStatus::Clean {
                errors.push(ValidationError::new(
                    format!("referenced attachment [{attachment_id}] is not clean"),
                    location.to_string(),
                ));
            }
        }
    }
}

fn check_window(
    field: &str,
    date: NaiveDate,
    incorporated_on: NaiveDate,
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !within_incorporation_window(date, incorporated_on) {
        errors.push(ValidationError::new(
            format!("{field} is outside the incorporation window"),
            location.to_string(),
        ));
    }
}

fn check_resolution(
    snapshot: &CaseSnapshot,
    incorporated_on: NaiveDate,
    errors: &mut Vec<ValidationError>,
) {
    let Some(resolution) = &snapshot.resolution else {
        return;
    };
    const LOCATION: &str = "resolution";

    check_window(
        "date_of_resolution",
        resolution.date_of_resolution,
        incorporated_on,
        LOCATION,
        errors,
    );
    if resolution.attachments.len() != 1 {
        errors.push(ValidationError::new(
            "resolution must reference exactly one attachment",
            LOCATION,
        ));
    }
    for attachment_id in &resolution.attachments {
        check_reference(
            snapshot,
            attachment_id,
            &[AttachmentType::Resolution],
            LOCATION,
            errors,
        );
    }
}

fn check_statement_of_affairs(
    snapshot: &CaseSnapshot,
    incorporated_on: NaiveDate,
    errors: &mut Vec<ValidationError>,
) {
    let Some(statement) = &snapshot.statement_of_affairs else {
        return;
    };
    const LOCATION: &str = "statement-of-affairs";

    check_window(
        "statement_date",
        statement.statement_date,
        incorporated_on,
        LOCATION,
        errors,
    );

    let statements = statement
        .attachments
        .iter()
        .filter_map(|id| find_attachment(snapshot, id))
        .filter(|a| a.attachment_type.is_statement())
        .count();
    if !(1..=2).contains(&statements) {
        errors.push(ValidationError::new(
            "statement of affairs must reference one or two statement attachments",
            LOCATION,
        ));
    }
    for attachment_id in &statement.attachments {
        check_reference(
            snapshot,
            attachment_id,
            &[
                AttachmentType::StatementOfAffairsDirector,
                AttachmentType::StatementOfAffairsLiquidator,
                AttachmentType::StatementOfConcurrence,
            ],
            LOCATION,
            errors,
        );
    }
}

fn check_progress_report(
    snapshot: &CaseSnapshot,
    incorporated_on: NaiveDate,
    errors: &mut Vec<ValidationError>,
) {
    let Some(report) = &snapshot.progress_report else {
        return;
    };
    const LOCATION: &str = "progress-report";

    check_window("from_date", report.from_date, incorporated_on, LOCATION, errors);
    check_window("to_date", report.to_date, incorporated_on, LOCATION, errors);
    if report.to_date < report.from_date {
        errors.push(ValidationError::new(
            "to_date must not be before from_date",
            LOCATION,
        ));
    }
    if report.attachments.len() != 1 {
        errors.push(ValidationError::new(
            "progress report must reference exactly one attachment",
            LOCATION,
        ));
    }
    for attachment_id in &report.attachments {
        check_reference(
            snapshot,
            attachment_id,
            &[AttachmentType::ProgressReport],
            LOCATION,
            errors,
        );
    }
}
