//! Case aggregate types and company restrictions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use windup_shared::{AppError, AppResult, types::mint_etag};

use crate::clients::CompanyProfile;
use crate::links;

/// Resource kind marker for the case.
pub const CASE_KIND: &str = "insolvency#case";

/// Conflict message for a repeated create on the same transaction.
pub const DUPLICATE_CASE_ERROR: &str =
    "an insolvency case already exists for this transaction id";

/// Jurisdictions a company may be registered in to file a CVL.
pub const ALLOWED_JURISDICTIONS: &[&str] = &["england", "england-wales", "wales"];

/// Company statuses that cannot enter voluntary liquidation.
pub const FORBIDDEN_COMPANY_STATUSES: &[&str] =
    &["dissolved", "administration", "converted-closed"];

/// Company types that cannot enter voluntary liquidation.
pub const FORBIDDEN_COMPANY_TYPES: &[&str] = &[
    "converted-or-closed",
    "protected-cell-company",
    "assurance-company",
    "icvc-securities",
    "icvc-warrant",
    "icvc-umbrella",
    "registered-society-non-jurisdictional",
    "industrial-and-provident-society",
    "northern-ireland",
    "northern-ireland-other",
    "royal-charter",
    "investment-company-with-variable-capital",
    "unregistered-company",
    "other",
    "uk-establishment",
    "scottish-partnership",
    "charitable-incorporated-organisation",
    "scottish-charitable-incorporated-organisation",
    "further-education-or-sixth-form-college-corporation",
];

/// Supported insolvency case types. Members' voluntary liquidation is
/// reserved on the wire but not yet accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseType {
    /// Creditors' voluntary liquidation.
    CreditorsVoluntaryLiquidation,
}

impl CaseType {
    /// Wire form of the case type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditorsVoluntaryLiquidation => "creditors-voluntary-liquidation",
        }
    }

    /// Parses the wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "creditors-voluntary-liquidation" => Some(Self::CreditorsVoluntaryLiquidation),
            _ => None,
        }
    }
}

/// Links carried by the case resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLinks {
    /// The case itself.
    #[serde(rename = "self")]
    pub this: String,
    /// The owning filing transaction.
    pub transaction: String,
    /// The whole-case validation gate.
    pub validation_status: String,
}

/// The case aggregate root. Child collections are persisted as sibling
/// documents; the case carries a projection of practitioner links that the
/// store maintains alongside the practitioner rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsolvencyCase {
    /// Owning transaction id; the aggregate key.
    pub transaction_id: String,
    /// Insolvency case type.
    pub case_type: CaseType,
    /// Company number as supplied by the caller.
    pub company_number: String,
    /// Company name as supplied by the caller.
    pub company_name: String,
    /// Write-versioning tag; changes on any write to the case or its
    /// children.
    pub etag: String,
    /// Resource kind marker.
    pub kind: String,
    /// Practitioner id to self-link projection.
    #[serde(default)]
    pub practitioners: BTreeMap<String, String>,
    /// Case links.
    pub links: CaseLinks,
}

impl InsolvencyCase {
    /// Builds a fresh case with a minted etag and the canonical links.
    ///
    /// # Errors
    ///
    /// Returns an error if the etag cannot be minted.
    pub fn build(
        transaction_id: &str,
        case_type: CaseType,
        company_number: String,
        company_name: String,
    ) -> AppResult<Self> {
        Ok(Self {
            transaction_id: transaction_id.to_string(),
            case_type,
            company_number,
            company_name,
            etag: mint_etag()?,
            kind: CASE_KIND.to_string(),
            practitioners: BTreeMap::new(),
            links: CaseLinks {
                this: links::case(transaction_id),
                transaction: links::transaction(transaction_id),
                validation_status: links::validation_status(transaction_id),
            },
        })
    }
}

/// Request body for creating a case. Every field is optional so missing
/// ones can be reported together by wire name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCase {
    /// Company number.
    pub company_number: Option<String>,
    /// Company name, compared with the registered profile via alpha keys.
    pub company_name: Option<String>,
    /// Case type wire tag.
    pub case_type: Option<String>,
}

/// Rejects companies whose jurisdiction, status or type rules out a CVL.
///
/// # Errors
///
/// Returns `Forbidden` naming the failing restriction.
pub fn check_company_restrictions(profile: &CompanyProfile) -> AppResult<()> {
    if !ALLOWED_JURISDICTIONS.contains(&profile.jurisdiction.as_str()) {
        return Err(AppError::Forbidden(format!(
            "jurisdiction [{}] is not permitted for insolvency filings",
            profile.jurisdiction
        )));
    }
    if FORBIDDEN_COMPANY_STATUSES.contains(&profile.company_status.as_str()) {
        return Err(AppError::Forbidden(format!(
            "company status [{}] is not permitted for insolvency filings",
            profile.company_status
        )));
    }
    if FORBIDDEN_COMPANY_TYPES.contains(&profile.company_type.as_str()) {
        return Err(AppError::Forbidden(format!(
            "company type [{}] is not permitted for insolvency filings",
            profile.company_type
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile(jurisdiction: &str, status: &str, company_type: &str) -> CompanyProfile {
        CompanyProfile {
            company_name: "companyName".to_string(),
            jurisdiction: jurisdiction.to_string(),
            company_status: status.to_string(),
            company_type: company_type.to_string(),
            date_of_creation: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_case_type_round_trip() {
        let t = CaseType::CreditorsVoluntaryLiquidation;
        assert_eq!(CaseType::parse(t.as_str()), Some(t));
        assert_eq!(CaseType::parse("members-voluntary-liquidation"), None);

        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"creditors-voluntary-liquidation\"");
    }

    #[test]
    fn test_company_restrictions() {
        assert!(check_company_restrictions(&profile("england", "active", "ltd")).is_ok());
        assert!(check_company_restrictions(&profile("england-wales", "active", "plc")).is_ok());

        assert!(check_company_restrictions(&profile("scotland", "active", "ltd")).is_err());
        assert!(check_company_restrictions(&profile("england", "dissolved", "ltd")).is_err());
        assert!(
            check_company_restrictions(&profile("wales", "active", "royal-charter")).is_err()
        );
    }

    #[test]
    fn test_forbidden_type_list_is_complete() {
        assert_eq!(FORBIDDEN_COMPANY_TYPES.len(), 19);
    }

    #[test]
    fn test_build_mints_etag_and_links() {
        let case = InsolvencyCase::build(
            "12345678",
            CaseType::CreditorsVoluntaryLiquidation,
            "01234567".to_string(),
            "companyName".to_string(),
        )
        .unwrap();
        assert_eq!(case.etag.len(), 56);
        assert_eq!(case.links.this, "/transactions/12345678/insolvency");
        assert_eq!(
            case.links.validation_status,
            "/transactions/12345678/insolvency/validation-status"
        );
        assert!(case.practitioners.is_empty());
    }
}
