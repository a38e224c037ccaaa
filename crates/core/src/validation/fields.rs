//! Structural field validation.
//!
//! Request bodies arrive with every field optional so that a single response
//! can name all the missing ones by wire name.

use std::sync::LazyLock;

use regex::Regex;
use windup_shared::{AppError, AppResult};

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0[1-9][0-9]{9}$").expect("telephone pattern is well-formed")
});

// Unicode letters plus the punctuation that occurs in real names.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}]+(?:[ '\-][\p{L}\p{M}]+)*$").expect("name pattern is well-formed")
});

/// Collects missing required fields and reports them in one message.
#[derive(Debug, Default)]
pub struct MissingFields {
    missing: Vec<&'static str>,
}

impl MissingFields {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` as missing when `present` is false.
    pub fn check(&mut self, name: &'static str, present: bool) -> &mut Self {
        if !present {
            self.missing.push(name);
        }
        self
    }

    /// Fails with one aggregated message naming every missing field.
    ///
    /// # Errors
    ///
    /// Returns a validation error when any required field was absent.
    pub fn into_result(self) -> AppResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Validates a UK telephone number: starts with 0, no spaces, 11 digits.
///
/// # Errors
///
/// Returns a validation error naming the field.
pub fn validate_telephone(value: &str) -> AppResult<()> {
    if TELEPHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "telephone_number must be 11 digits starting with 0 and contain no spaces".to_string(),
        ))
    }
}

/// Validates a person-name field against the letters-plus-punctuation shape.
///
/// # Errors
///
/// Returns a validation error naming the field.
pub fn validate_name(field: &str, value: &str) -> AppResult<()> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} contains invalid characters"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_aggregate() {
        let mut missing = MissingFields::new();
        missing
            .check("company_number", false)
            .check("company_name", true)
            .check("case_type", false);
        let err = missing.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: company_number, case_type"
        );
    }

    #[test]
    fn test_missing_fields_ok_when_all_present() {
        let mut missing = MissingFields::new();
        missing.check("company_number", true);
        assert!(missing.into_result().is_ok());
    }

    #[rstest::rstest]
    #[case("07123456789", true)]
    #[case("01234567890", true)]
    #[case("00123456789", false)] // second digit zero
    #[case("7123456789", false)] // no leading zero
    #[case("0712345678", false)] // too short
    #[case("071234567890", false)] // too long
    #[case("07123 45678", false)] // space
    #[case("+4471234567", false)]
    fn test_telephone_shapes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_telephone(value).is_ok(), valid, "{value}");
    }

    #[test]
    fn test_name_shapes() {
        assert!(validate_name("first_name", "First").is_ok());
        assert!(validate_name("last_name", "O'Brien").is_ok());
        assert!(validate_name("last_name", "Smith-Jones").is_ok());
        assert!(validate_name("first_name", "Çetin").is_ok());
        assert!(validate_name("first_name", "Anne Marie").is_ok());
        assert!(validate_name("first_name", "R2D2").is_err());
        assert!(validate_name("first_name", "").is_err());
        assert!(validate_name("first_name", " leading").is_err());
        assert!(validate_name("first_name", "trailing-").is_err());
    }
}
