//! Shape validation of untyped credential payloads.
//!
//! A payload is only handed to the store once it has been turned into
//! [`ValidCredentials`]; anything else is a [`ValidationFailure`].

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// Minimum accepted password length, in UTF-16 code units.
///
/// Browser clients measure string length this way, so a password that a
/// web form accepted is never refused here.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Why a payload was refused. Display output names fields only, never
/// the submitted values.
#[derive(Error, Debug)]
pub enum ValidationFailure {
    #[error("credentials payload has the wrong shape")]
    Shape(#[source] serde_json::Error),

    #[error("credentials payload failed validation on: {fields}", fields = invalid_fields(.0))]
    Fields(#[from] ValidationErrors),
}

fn invalid_fields(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors.errors().keys().map(ToString::to_string).collect();
    fields.sort();
    fields.join(", ")
}

#[derive(Deserialize, Validate)]
struct RawCredentials {
    #[validate(email)]
    email: String,
    #[validate(custom(function = "validate_password_length"))]
    password: String,
}

fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password_length(password) >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(ValidationError::new("length"))
    }
}

fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}

/// Credentials that passed the schema: a well-formed email and a password
/// of at least [`MIN_PASSWORD_LENGTH`] UTF-16 code units.
pub struct ValidCredentials {
    email: String,
    password: SecretString,
}

impl ValidCredentials {
    /// The email exactly as supplied.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The lookup key: the email lowercased.
    pub fn normalized_email(&self) -> String {
        self.email.to_lowercase()
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn into_parts(self) -> (String, SecretString) {
        (self.email, self.password)
    }
}

impl std::fmt::Debug for ValidCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parses an untyped payload into [`ValidCredentials`].
///
/// Unknown keys are ignored. Missing or non-string `email`/`password`
/// fields are shape failures; a bad email or short password are field
/// failures.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] describing the first problem found.
pub fn parse_credentials(payload: &Value) -> Result<ValidCredentials, ValidationFailure> {
    let raw = RawCredentials::deserialize(payload).map_err(ValidationFailure::Shape)?;
    raw.validate()?;

    Ok(ValidCredentials {
        email: raw.email,
        password: SecretString::new(raw.password),
    })
}

/// Length check shared with the CLI prompt.
pub fn meets_min_length(password: &SecretString) -> bool {
    password_length(password.expose_secret()) >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_well_formed_payload() {
        let creds = parse_credentials(&json!({
            "email": "User@Example.com",
            "password": "secret1",
            "csrfToken": "ignored"
        }))
        .unwrap();

        assert_eq!(creds.email(), "User@Example.com");
        assert_eq!(creds.normalized_email(), "user@example.com");
        assert_eq!(creds.password().expose_secret(), "secret1");
    }

    #[test]
    fn test_rejects_short_password() {
        let result = parse_credentials(&json!({ "email": "a@b.com", "password": "12345" }));
        assert!(matches!(result, Err(ValidationFailure::Fields(_))));
    }

    #[test]
    fn test_rejects_exactly_min_length_minus_one_but_accepts_min_length() {
        assert!(parse_credentials(&json!({ "email": "a@b.com", "password": "abcde" })).is_err());
        assert!(parse_credentials(&json!({ "email": "a@b.com", "password": "abcdef" })).is_ok());
    }

    #[test]
    fn test_rejects_malformed_email() {
        for email in ["", "not-an-email", "a@", "@b.com"] {
            let result = parse_credentials(&json!({ "email": email, "password": "secret1" }));
            assert!(matches!(result, Err(ValidationFailure::Fields(_))), "{email}");
        }
    }

    #[test]
    fn test_rejects_missing_and_mistyped_fields() {
        let cases = [
            json!({ "password": "secret1" }),
            json!({ "email": "a@b.com" }),
            json!({ "email": "a@b.com", "password": 123456 }),
            json!({ "email": ["a@b.com"], "password": "secret1" }),
            json!(null),
            json!("a@b.com:secret1"),
        ];

        for payload in cases {
            let result = parse_credentials(&payload);
            assert!(matches!(result, Err(ValidationFailure::Shape(_))), "{payload}");
        }
    }

    #[test]
    fn test_failure_messages_never_echo_values() {
        let short = parse_credentials(&json!({ "email": "a@b.com", "password": "hunt3" })).unwrap_err();
        assert_eq!(short.to_string(), "credentials payload failed validation on: password");

        let both = parse_credentials(&json!({ "email": "nope", "password": "hunt3" })).unwrap_err();
        assert_eq!(both.to_string(), "credentials payload failed validation on: email, password");

        let mistyped = parse_credentials(&json!({ "email": "a@b.com", "password": 9_876_543 })).unwrap_err();
        assert!(!mistyped.to_string().contains("9876543"));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = parse_credentials(&json!({ "email": "a@b.com", "password": "hunter22" })).unwrap();
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn test_meets_min_length_counts_utf16_units() {
        assert!(meets_min_length(&SecretString::new("ñññııı".to_string())));
        assert!(meets_min_length(&SecretString::new("😀😀😀".to_string())));
        assert!(!meets_min_length(&SecretString::new("😀😀".to_string())));
        assert!(!meets_min_length(&SecretString::new("short".to_string())));
    }

    #[test]
    fn test_astral_characters_count_as_two_units() {
        let three = parse_credentials(&json!({ "email": "a@b.com", "password": "😀😀😀" }));
        assert_eq!(three.unwrap().password().expose_secret(), "😀😀😀");

        let two = parse_credentials(&json!({ "email": "a@b.com", "password": "😀😀" }));
        assert!(matches!(two, Err(ValidationFailure::Fields(_))));

        let mixed = parse_credentials(&json!({ "email": "a@b.com", "password": "ab😀c" }));
        assert!(mixed.is_ok());
    }
}
