use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Why a raw row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("region is empty")]
    EmptyRegion,
    #[error("year {0:?} is not an integer")]
    InvalidYear(String),
    #[error("value {0:?} is not a finite number")]
    InvalidValue(String),
}

/// How an empty `Values` field is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyValues {
    /// Empty text counts as a 0 contribution; the key still gets a leaf.
    #[default]
    Zero,
    /// Empty text rejects the row like any other unparsable value.
    Reject,
}

/// Parse a year such as `"2020"`, `" 2020 "` or `"2020.0"`.
///
/// Float columns and JSON numbers arrive as `"2020.0"`; those are accepted
/// when integral and in range.
pub fn parse_year(raw: &str) -> Result<i32, RowError> {
    let text = raw.trim();
    if let Ok(year) = text.parse::<i32>() {
        return Ok(year);
    }
    match text.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => Ok(f as i32),
        _ => Err(RowError::InvalidYear(raw.to_string())),
    }
}

/// Parse an emission value written with a decimal comma (`"1,5"`).
///
/// Only the first comma is treated as the decimal separator, so `"1,234,5"`
/// is rejected.
pub fn parse_value(raw: &str, empty: EmptyValues) -> Result<f64, RowError> {
    let text = raw.trim();
    if text.is_empty() {
        return match empty {
            EmptyValues::Zero => Ok(0.0),
            EmptyValues::Reject => Err(RowError::InvalidValue(raw.to_string())),
        };
    }
    match text.replacen(',', ".", 1).parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowError::InvalidValue(raw.to_string())),
    }
}
