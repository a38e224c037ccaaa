//! Filing date parsing and range rules.
//!
//! All comparisons are UTC calendar dates. Dates are never compared as
//! string prefixes.

use chrono::{NaiveDate, Utc};
use windup_shared::{AppError, AppResult};

/// Parses a `YYYY-MM-DD` filing date. A trailing time portion (separated by
/// `T` or a space) is ignored.
///
/// # Errors
///
/// Returns a validation error naming the field when the value does not
/// parse.
pub fn parse_filing_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    let date_part = match value.split_once(['T', ' ']) {
        Some((date, _)) => date,
        None => value,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} is not a valid date: [{value}]")))
}

/// Today as a UTC calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// True when the date is after today.
#[must_use]
pub fn is_in_future(date: NaiveDate) -> bool {
    date > today()
}

/// True when `first` is strictly before `second`.
#[must_use]
pub fn is_before(first: NaiveDate, second: NaiveDate) -> bool {
    first < second
}

/// True when the date sits in `[incorporated_on, today]` - the canonical
/// window for every resource date on a case.
#[must_use]
pub fn within_incorporation_window(date: NaiveDate, incorporated_on: NaiveDate) -> bool {
    !is_in_future(date) && date >= incorporated_on
}

/// Checks the canonical window and reports which bound was broken.
///
/// # Errors
///
/// Returns a validation error naming the field and the broken bound.
pub fn validate_filing_window(
    field: &str,
    date: NaiveDate,
    incorporated_on: NaiveDate,
) -> AppResult<()> {
    if is_in_future(date) {
        return Err(AppError::Validation(format!(
            "{field} must not be in the future"
        )));
    }
    if date < incorporated_on {
        return Err(AppError::Validation(format!(
            "{field} must not be before the company was incorporated"
        )));
    }
    Ok(())
}
