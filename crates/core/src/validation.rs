//! Bridges `validator` derive output into [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run `validator` rules on a request body.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|e| CoreError::Validation(describe(&e)))
}

/// Flatten field errors into `field: message` pairs, sorted by field name so
/// the output is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Normalise an email for lookups and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn valid_input_passes() {
        let input = Signup {
            email: "a@example.com".into(),
            password: "secret1".into(),
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn errors_name_each_field() {
        let input = Signup {
            email: "nope".into(),
            password: "123".into(),
        };
        let err = validate_input(&input).unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg)
            if msg == "email: must be a valid email; password: length");
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
