//! Field validators shared by request DTOs.
//!
//! Each function matches the signature `validator` expects for
//! `#[validate(custom(function = "..."))]`.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Optional leading `+`, then 7 to 15 digits with spaces or dashes between groups.
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9](?:[0-9 \-]{5,18})[0-9]$").unwrap();

    /// Flat numbers such as `101`, `A-204` or `B12`.
    static ref FLAT_NUMBER_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if PHONE_REGEX.is_match(phone) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(error("phone_format", "Phone number must contain 7 to 15 digits"))
    }
}

/// Validates a flat number.
pub fn validate_flat_number(flat_number: &str) -> Result<(), ValidationError> {
    if flat_number.len() <= 20 && FLAT_NUMBER_REGEX.is_match(flat_number) {
        Ok(())
    } else {
        Err(error(
            "flat_number_format",
            "Flat number may only contain letters, digits and dashes",
        ))
    }
}

/// Validates password strength.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    match crate::password::password_weakness(password) {
        None => Ok(()),
        Some(reason) => Err(error("password_strength", reason)),
    }
}
