use regex::Regex;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

lazy_static::lazy_static! {
    pub static ref COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    static ref DIGIT_REGEX: Regex = Regex::new(r"[0-9]").unwrap();
    static ref LOWERCASE_REGEX: Regex = Regex::new(r"[a-z]").unwrap();
    static ref UPPERCASE_REGEX: Regex = Regex::new(r"[A-Z]").unwrap();
}

/// Requires at least one digit, one lowercase and one uppercase letter.
/// Length bounds are checked separately by the `length` validator.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if DIGIT_REGEX.is_match(password)
        && LOWERCASE_REGEX.is_match(password)
        && UPPERCASE_REGEX.is_match(password)
    {
        return Ok(());
    }

    let mut error = ValidationError::new("password_strength");
    error.message = Some(Cow::from(
        "\"password\" must contain a digit, a lowercase and an uppercase letter",
    ));
    Err(error)
}

/// Request bodies that report failures field by field, in declaration order.
pub trait DeclaredFields: Validate {
    const FIELDS: &'static [&'static str];
}

/// Validates `input` and keeps only the message of its first failing field.
pub fn validate_input<T: DeclaredFields>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::ValidationError(first_message(&errors, T::FIELDS)))
}

/// Reduces a set of validation failures to the single message shown to clients.
///
/// Fields are visited in `order`; any field missing from it comes last, by name.
pub fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| {
        let rank = order.iter().position(|name| name == field).unwrap_or(order.len());
        (rank, *field)
    });

    fields
        .into_iter()
        .find_map(|(field, errors)| errors.first().map(|error| describe(field, error)))
        .unwrap_or_else(|| "Invalid input".to_string())
}

fn describe(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("\"{}\" is invalid ({})", field, error.code),
    }
}
