//! Local input validation for the employer forms
//!
//! These checks run before any call to the auth service or the listing
//! service. A failure leaves the form where it is and shows the error text.

use jobboard_types::OpenPositions;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

lazy_static! {
    /// `local@domain.tld` with no whitespace and a single `@`
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Minimum password length for new accounts
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check an email address has the `local@domain.tld` shape (after trimming)
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate password strength
///
/// Requirements:
/// - At least 8 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one digit
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// Raw profile inputs from the third signup step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    /// Label of the selected [`OpenPositions`] bucket, empty when unselected
    pub open_positions: String,
}

/// Employer profile after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub open_positions: OpenPositions,
}

/// All profile fields are required and must be non-empty after trimming
pub fn validate_profile(fields: &ProfileFields) -> Result<EmployerProfile, ValidationError> {
    let required = [
        fields.first_name.trim(),
        fields.last_name.trim(),
        fields.company.trim(),
        fields.job_title.trim(),
    ];
    if required.iter().any(|v| v.is_empty()) {
        return Err(ValidationError::MissingRequiredFields);
    }

    let open_positions = OpenPositions::parse(fields.open_positions.trim())
        .map_err(|_| ValidationError::MissingRequiredFields)?;

    Ok(EmployerProfile {
        first_name: required[0].to_string(),
        last_name: required[1].to_string(),
        company: required[2].to_string(),
        job_title: required[3].to_string(),
        open_positions,
    })
}
