//! Input validation rules shared by the wizards
//!
//! Every rule returns a [`ValidationError`] whose `Display` output is the
//! exact message shown next to the offending field.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// A user input failed a local validation rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is required")]
    EmailRequired,

    #[error("please enter a valid email address")]
    InvalidEmail,

    #[error("please enter a valid {length}-digit verification code")]
    MalformedCode { length: usize },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("please fill in all required fields")]
    MissingRequiredFields,

    #[error("please enter a valid package weight")]
    InvalidWeight,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Check that `email` looks like `local@domain.tld`
///
/// Surrounding whitespace is ignored; a blank value is reported as missing
/// rather than malformed.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Check that `code` is exactly `length` ASCII digits
pub fn validate_code(code: &str, length: usize) -> Result<(), ValidationError> {
    if code.len() != length || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::MalformedCode { length });
    }
    Ok(())
}

/// Check a new password and its confirmation
///
/// Length is counted in characters and checked before the match.
pub fn validate_new_password(
    new_password: &str,
    confirm_password: &str,
    min_length: usize,
) -> Result<(), ValidationError> {
    if new_password.chars().count() < min_length {
        return Err(ValidationError::PasswordTooShort { min: min_length });
    }
    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Check that every value is non-blank
pub fn require_all<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<(), ValidationError> {
    if values.into_iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::MissingRequiredFields);
    }
    Ok(())
}

/// Parse a strictly positive weight in kilograms
pub fn parse_weight(value: &str) -> Result<f64, ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(kg) if kg.is_finite() && kg > 0.0 => Ok(kg),
        _ => Err(ValidationError::InvalidWeight),
    }
}
