//! Registration and configuration validation
//!
//! Input rules applied before anything reaches a store: trimmed non-empty
//! text fields with length caps, four-digit PINs, and a non-zero target
//! count for the draw gate.

use crate::constants::{MAX_NAME_CHARS, MAX_WISHLIST_CHARS, PIN_LENGTH};

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation errors raised for user-supplied input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Field too long: {field} (maximum {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid PIN: {reason}")]
    InvalidPin { reason: String },

    #[error("Invalid target count: must be at least 1")]
    InvalidTargetCount,
}

/// Trim a free-text field and reject it when empty or over `max` characters.
pub fn require_text(field: &'static str, value: &str, max: usize) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

pub fn validate_name(name: &str) -> ValidationResult<String> {
    require_text("name", name, MAX_NAME_CHARS)
}

pub fn validate_wishlist(wishlist: &str) -> ValidationResult<String> {
    require_text("wishlist", wishlist, MAX_WISHLIST_CHARS)
}

/// Check that a PIN is exactly [`PIN_LENGTH`] ASCII digits.
///
/// Surrounding whitespace is not stripped: `" 1234"` is rejected so the value
/// stored at registration is byte-for-byte what must be typed later.
pub fn validate_pin(pin: &str) -> ValidationResult<()> {
    if pin.len() != PIN_LENGTH {
        return Err(ValidationError::InvalidPin {
            reason: format!("must be exactly {} digits", PIN_LENGTH),
        });
    }
    if !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPin {
            reason: "must contain digits only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_target_count(target_count: u32) -> ValidationResult<()> {
    if target_count == 0 {
        return Err(ValidationError::InvalidTargetCount);
    }
    Ok(())
}
