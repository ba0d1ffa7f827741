//! Shared form validation helpers.

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// One message to show next to a form field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Flattens validator output into field messages, sorted by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors.field_errors().into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| FieldError::new(field, describe(e))))
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn describe(e: &ValidationError) -> String {
    match &e.message {
        Some(m) => m.to_string(),
        None => match e.code.as_ref() {
            "email" => "Enter a valid email address".to_string(),
            "length" => "This field is required".to_string(),
            code => format!("Invalid value ({code})"),
        },
    }
}

/// Accepts 7 to 15 digits with the usual separators (`+`, spaces, dashes, parentheses).
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if allowed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Enter a valid phone number".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email)]
        email: String,
        #[validate(custom = "validate_phone")]
        phone: String,
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("+54 (11) 5555-1234").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
    }

    #[test]
    fn test_field_errors_sorted_with_messages() {
        let errors = Probe { email: "nope".into(), phone: "1".into() }.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields, vec![
            FieldError::new("email", "Enter a valid email address"),
            FieldError::new("phone", "Enter a valid phone number"),
        ]);
    }
}
