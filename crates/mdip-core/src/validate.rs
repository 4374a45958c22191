//! Field rules used by every entity constructor.
//!
//! Each helper checks one rule and reports the field it was applied to. The
//! helpers never repair input: a value is accepted as given or rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::enums::Enumerated;
use crate::errors::{Rule, ValidationError};

/// Reject empty and whitespace-only text.
///
/// # Errors
///
/// Returns [`Rule::Required`] for blank input.
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, Rule::Required));
    }
    Ok(())
}

/// Normalize an optional text column: blank means absent.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Require at least `min` characters.
///
/// # Errors
///
/// Returns [`Rule::MinLength`] when the value is shorter.
pub fn min_length(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::new(field, Rule::MinLength(min)));
    }
    Ok(())
}

/// Require every character to satisfy `allowed`.
///
/// # Errors
///
/// Returns [`Rule::Charset`] naming `described` on the first offending char.
pub fn charset(
    field: &'static str,
    value: &str,
    allowed: impl Fn(char) -> bool,
    described: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new(field, Rule::Charset(described)))
    }
}

/// Exact, case-sensitive enumeration membership.
///
/// # Errors
///
/// Returns [`Rule::NotAMember`] with the allowed labels.
pub fn member<E: Enumerated>(field: &'static str, raw: &str) -> Result<E, ValidationError> {
    E::from_label(raw).map_err(|e| e.for_field(field))
}

/// Check an already-typed integer is not negative.
///
/// # Errors
///
/// Returns [`Rule::NonNegative`].
pub const fn non_negative(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(field, Rule::NonNegative));
    }
    Ok(value)
}

/// Check an already-typed number is finite and not negative.
///
/// # Errors
///
/// Returns [`Rule::NotANumber`] for NaN/infinity, [`Rule::NonNegative`] below zero.
pub fn non_negative_number(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(
            field,
            Rule::NotANumber(value.to_string()),
        ));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, Rule::NonNegative));
    }
    Ok(value)
}

/// Parse a whole number that must not be negative.
///
/// # Errors
///
/// Returns [`Rule::Required`], [`Rule::NotAnInteger`] or [`Rule::NonNegative`].
pub fn parse_count(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    required(field, raw)?;
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new(field, Rule::NotAnInteger(raw.to_string())))?;
    non_negative(field, value)
}

/// Parse an optional non-negative number. Blank input means absent.
///
/// # Errors
///
/// Returns [`Rule::NotANumber`] or [`Rule::NonNegative`].
pub fn parse_optional_hours(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::new(field, Rule::NotANumber(raw.to_string())))?;
    non_negative_number(field, value).map(Some)
}

/// Parse a timestamp in any of the accepted source formats.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// (read as UTC) and a bare `YYYY-MM-DD` (midnight UTC).
///
/// # Errors
///
/// Returns [`Rule::Required`] for blank input, [`Rule::NotADate`] otherwise.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    required(field, raw)?;
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ValidationError::new(field, Rule::NotADate(raw.to_string())))
}

/// Parse an optional user reference. Blank input means absent.
///
/// # Errors
///
/// Returns [`Rule::NotAnInteger`] or [`Rule::NonNegative`].
pub fn parse_optional_ref(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<i64>, ValidationError> {
    match raw.filter(|r| !r.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => parse_count(field, raw).map(Some),
    }
}
