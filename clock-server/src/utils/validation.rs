//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Employee name, department, position
pub const MAX_NAME_LEN: usize = 200;

/// Upper bound for a day rate
pub const MAX_DAY_RATE: f64 = 1_000_000.0;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate a day rate is finite, non-negative and within bounds
pub fn validate_day_rate(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation("day_rate must be a finite number"));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "day_rate must be non-negative, got {value}"
        )));
    }
    if value > MAX_DAY_RATE {
        return Err(AppError::validation(format!(
            "day_rate exceeds maximum allowed ({MAX_DAY_RATE}), got {value}"
        )));
    }
    Ok(())
}

/// Trim optional text, mapping blank values to `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
