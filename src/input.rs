//! Conversions from user-entered text to typed values.

use chrono::NaiveDate;

use crate::catalog::CUSTOM_TYPE;
use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Blank input means "no date given".
pub fn parse_optional_date(s: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(s).map(Some)
    }
}

pub fn parse_threshold_days(s: &str) -> Result<u32, ValidationError> {
    match s.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ValidationError::InvalidThresholdDays(s.to_string())),
    }
}

pub fn parse_threshold_usage(s: &str) -> Result<f64, ValidationError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidThresholdUsage(s.to_string())),
    }
}

/// Any finite number; NaN and infinities are rejected.
pub fn parse_quantity(s: &str) -> Result<f64, ValidationError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NonNumericQuantity(s.to_string())),
    }
}

/// Builds a task id of the form `<slug>_<unix seconds>`.
pub fn generate_task_id(name: &str, unix_secs: i64) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "task" } else { slug };
    format!("{}_{}", slug, unix_secs)
}

/// Blank types become the custom type key.
pub fn normalize_machine_type(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        CUSTOM_TYPE.to_string()
    } else {
        s.to_string()
    }
}
