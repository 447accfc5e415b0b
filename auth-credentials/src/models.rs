use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{CredentialsError, Result};

/// Column (or JSON key) names used to pull the email and the password hash
/// out of a stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordColumns {
    pub email: String,
    pub password: String,
}

impl Default for RecordColumns {
    fn default() -> Self {
        Self {
            email: "email".to_string(),
            password: "password".to_string(),
        }
    }
}

/// A stored account as read from a [`UserStore`](crate::repository::UserStore).
///
/// The hash is deliberately not `Serialize` and is masked in `Debug` output.
#[derive(Clone, PartialEq)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub profile: Map<String, Value>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            profile: Map::new(),
        }
    }

    /// Adds a pass-through profile field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// Builds a record from a JSON row object.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::MalformedRecord`] when the row is not an
    /// object or the email/password columns are missing or not strings.
    pub fn from_row(row: Value, columns: &RecordColumns) -> Result<Self> {
        let Value::Object(mut fields) = row else {
            return Err(CredentialsError::MalformedRecord(
                "user row is not a JSON object".to_string(),
            ));
        };

        let password_hash = take_string(&mut fields, &columns.password)?;
        let email = take_string(&mut fields, &columns.email)?;

        Ok(Self {
            email,
            password_hash,
            profile: fields,
        })
    }

    /// Drops the password hash and keeps everything else.
    pub fn into_identity(self) -> Identity {
        Identity {
            email: self.email,
            profile: self.profile,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("profile", &self.profile)
            .finish()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Result<String> {
    match fields.remove(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(CredentialsError::MalformedRecord(format!(
            "column `{key}` is not a string"
        ))),
        None => Err(CredentialsError::MalformedRecord(format!(
            "column `{key}` is missing"
        ))),
    }
}

/// The public-safe view of an authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}
