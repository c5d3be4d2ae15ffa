//! Field level checks shared by every profile model.
//!
//! All checks on optional text follow the same normalisation: the value is
//! trimmed and an empty string becomes `None`. The normalised value is
//! returned so callers write it back into the model.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::errors::ValidationError;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap();
    // language[_COUNTRY], e.g. "en", "es_ES"
    static ref LOCALE: Regex = Regex::new(r"^[a-z]{2,3}(_[A-Z]{2})?$").unwrap();
    // E.164 once separators are removed
    static ref TELEPHONE: Regex = Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap();
}

/// Oldest birth date accepted for a living user.
pub const OLDEST_BIRTH_DATE: (i32, u32, u32) = (1903, 1, 2);

pub fn validate_nullable_string(
    code_prefix: &str,
    field: &str,
    max_size: usize,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_size {
        return Err(ValidationError::field(
            code_prefix,
            field,
            format!(
                "The '{}' can not be larger than '{}' characters.",
                field, max_size
            ),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Like [`validate_nullable_string`] but the value must be one of `possible_values`.
pub fn validate_nullable_string_in(
    code_prefix: &str,
    field: &str,
    max_size: usize,
    value: Option<String>,
    possible_values: &[&str],
) -> Result<Option<String>, ValidationError> {
    let value = validate_nullable_string(code_prefix, field, max_size, value)?;
    if let Some(ref v) = value {
        if !possible_values.contains(&v.as_str()) {
            return Err(ValidationError::field(
                code_prefix,
                field,
                format!(
                    "The '{}' value is not valid. It has to be one of: {}.",
                    v,
                    possible_values.join(", ")
                ),
            ));
        }
    }
    Ok(value)
}

pub fn validate_nullable_email(
    code_prefix: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let value = validate_nullable_string(code_prefix, field, 255, value)?;
    if let Some(ref email) = value {
        if !EMAIL.is_match(email) {
            return Err(ValidationError::field(
                code_prefix,
                field,
                format!("The '{}' is not a valid email address.", email),
            ));
        }
    }
    Ok(value)
}

pub fn validate_nullable_locale(
    code_prefix: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let value = validate_nullable_string(code_prefix, field, 50, value)?;
    if let Some(ref locale) = value {
        if !LOCALE.is_match(locale) {
            return Err(ValidationError::field(
                code_prefix,
                field,
                format!("The '{}' is not a valid locale.", locale),
            ));
        }
    }
    Ok(value)
}

/// Spaces, dashes, dots and parentheses are accepted as separators.
pub fn validate_nullable_telephone(
    code_prefix: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let value = validate_nullable_string(code_prefix, field, 50, value)?;
    if let Some(ref phone) = value {
        let digits: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();
        if !TELEPHONE.is_match(&digits) {
            return Err(ValidationError::field(
                code_prefix,
                field,
                format!("The '{}' is not a valid telephone number.", phone),
            ));
        }
    }
    Ok(value)
}

/// The value has to be an ISO-8601 instant such as `2017-07-21T17:32:03Z`.
pub fn validate_nullable_instant(
    code_prefix: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let value = validate_nullable_string(code_prefix, field, 255, value)?;
    if let Some(ref instant) = value {
        if DateTime::parse_from_rfc3339(instant).is_err() {
            return Err(ValidationError::field(
                code_prefix,
                field,
                format!("The '{}' is not a valid ISO-8601 instant.", instant),
            ));
        }
    }
    Ok(value)
}

pub fn validate_calendar_date(
    code_prefix: &str,
    year: i32,
    month: u8,
    day: u8,
) -> Result<NaiveDate, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::field(
            code_prefix,
            "month",
            "The month has to be on the range [1,12]",
        ));
    }
    if !(1..=31).contains(&day) {
        return Err(ValidationError::field(
            code_prefix,
            "day",
            "The day has to be on the range [1,31]",
        ));
    }
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
        ValidationError::new(
            code_prefix,
            format!("The date {}-{}-{} does not exist.", year, month, day),
        )
    })
}

pub fn validate_range(
    code_prefix: &str,
    field: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(ValidationError::field(
            code_prefix,
            field,
            format!("The {} has to be on the range [{},{}]", field, min, max),
        )),
        other => Ok(other),
    }
}
