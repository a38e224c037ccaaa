//! Resource link construction.
//!
//! All sub-resource links hang off the case link, which itself hangs off the
//! owning filing transaction.

/// Link to the filing transaction.
#[must_use]
pub fn transaction(transaction_id: &str) -> String {
    format!("/transactions/{transaction_id}")
}

/// Link to the insolvency case.
#[must_use]
pub fn case(transaction_id: &str) -> String {
    format!("/transactions/{transaction_id}/insolvency")
}

/// Link to the whole-case validation gate.
#[must_use]
pub fn validation_status(transaction_id: &str) -> String {
    format!("/transactions/{transaction_id}/insolvency/validation-status")
}

/// Link to a practitioner on the case.
#[must_use]
pub fn practitioner(transaction_id: &str, practitioner_id: &str) -> String {
    format!("/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}")
}

/// Link to a practitioner's appointment.
#[must_use]
pub fn appointment(transaction_id: &str, practitioner_id: &str) -> String {
    format!(
        "/transactions/{transaction_id}/insolvency/practitioners/{practitioner_id}/appointment"
    )
}

/// Link to an attachment's metadata.
#[must_use]
pub fn attachment(transaction_id: &str, attachment_id: &str) -> String {
    format!("/transactions/{transaction_id}/insolvency/attachments/{attachment_id}")
}

/// Link to an attachment's bytes.
#[must_use]
pub fn attachment_download(transaction_id: &str, attachment_id: &str) -> String {
    format!("/transactions/{transaction_id}/insolvency/attachments/{attachment_id}/download")
}
