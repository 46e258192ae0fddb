//! Date validation and reordering for E-utilities date windows.
//!
//! User-facing prompts take dates as `MM/DD/YYYY`; the E-utilities API
//! expects `YYYY/MM/DD`. The conversion is a pure reordering of the digit
//! groups with no zero-padding changes.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Date validation error types
#[derive(Error, Debug, PartialEq)]
pub enum DateError {
    #[error("date must be in MM/DD/YYYY format: {0}")]
    Format(String),

    #[error("month must be between 1 and 12")]
    MonthOutOfRange,

    #[error("day must be between 1 and 31")]
    DayOutOfRange,
}

static INPUT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-1][0-9]/[0-3][0-9]/[0-9]{4}$").expect("valid date regex"));

static SERVICE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}/[0-1][0-9]/[0-3][0-9]$").expect("valid date regex"));

/// Validate an `MM/DD/YYYY` date string and reorder it to `YYYY/MM/DD`.
///
/// The month must be in `[1, 12]` and the day in `[1, 31]`. Month-length and
/// leap-year combinations are not checked, so a date like `02/31/2020`
/// passes.
pub fn normalize_date(input: &str) -> Result<String, DateError> {
    if !INPUT_DATE.is_match(input) {
        return Err(DateError::Format(input.to_string()));
    }

    let month: u32 = input[0..2].parse().map_err(|_| DateError::MonthOutOfRange)?;
    if !(1..=12).contains(&month) {
        return Err(DateError::MonthOutOfRange);
    }

    let day: u32 = input[3..5].parse().map_err(|_| DateError::DayOutOfRange)?;
    if !(1..=31).contains(&day) {
        return Err(DateError::DayOutOfRange);
    }

    let parts: Vec<&str> = input.split('/').collect();
    Ok(format!("{}/{}/{}", parts[2], parts[0], parts[1]))
}

/// Reorder a `YYYY/MM/DD` date string back to `MM/DD/YYYY`.
///
/// Inverse of [`normalize_date`] for any string it accepted.
pub fn denormalize_date(input: &str) -> Result<String, DateError> {
    if !SERVICE_DATE.is_match(input) {
        return Err(DateError::Format(input.to_string()));
    }

    let parts: Vec<&str> = input.split('/').collect();
    Ok(format!("{}/{}/{}", parts[1], parts[2], parts[0]))
}
