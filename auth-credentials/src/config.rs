use crate::error::{CredentialsError, Result};
use crate::models::RecordColumns;
use crate::repository::validate_identifier;
use config::{Config, Environment, File};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix, e.g. `AUTH__HASHING__COST=10`.
pub const ENV_PREFIX: &str = "AUTH";

/// Longest accepted session lifetime: ten years.
pub const MAX_SESSION_AGE_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub pages: AuthPages,
    pub hashing: HashingSettings,
    pub store: StoreSettings,
    pub session: SessionSettings,
    pub logging: LoggerConfig,
}

/// Where the surrounding web layer sends users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPages {
    pub sign_in: String,
    pub new_user: String,
}

impl Default for AuthPages {
    fn default() -> Self {
        Self {
            sign_in: "/auth/login".to_string(),
            new_user: "/auth/new-account".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub cost: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    #[serde(skip_serializing)]
    pub database_url: Option<String>,
    pub users_table: String,
    pub email_column: String,
    pub password_column: String,
    pub max_connections: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            users_table: "users".to_string(),
            email_column: "email".to_string(),
            password_column: "password".to_string(),
            max_connections: 5,
        }
    }
}

impl StoreSettings {
    pub fn columns(&self) -> RecordColumns {
        RecordColumns {
            email: self.email_column.clone(),
            password: self.password_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub max_age_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_age_secs: 30 * 24 * 60 * 60,
        }
    }
}

impl SessionSettings {
    /// Session lifetime, clamped to `1..=MAX_SESSION_AGE_SECS` seconds so
    /// an unvalidated value cannot overflow.
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_secs.clamp(1, MAX_SESSION_AGE_SECS))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl AuthSettings {
    /// Loads settings from an optional file, then `AUTH__*` environment
    /// variables. `.env` is read first and `DATABASE_URL` is used when no
    /// store URL was configured.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be parsed or the result does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut settings = Self::load_layered(path, environment())?;
        if settings.store.database_url.is_none() {
            settings.store.database_url = std::env::var("DATABASE_URL").ok();
        }
        Ok(settings)
    }

    fn load_layered(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: AuthSettings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns [`CredentialsError::Config`] for an out-of-range bcrypt cost
    /// or a session age outside `1..=MAX_SESSION_AGE_SECS`, and
    /// [`CredentialsError::InvalidIdentifier`] for unusable table/column names.
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.hashing.cost) {
            return Err(CredentialsError::Config(config::ConfigError::Message(format!(
                "hashing.cost must be between 4 and 31, got {}",
                self.hashing.cost
            ))));
        }

        if !(1..=MAX_SESSION_AGE_SECS).contains(&self.session.max_age_secs) {
            return Err(CredentialsError::Config(config::ConfigError::Message(format!(
                "session.max_age_secs must be between 1 and {MAX_SESSION_AGE_SECS}, got {}",
                self.session.max_age_secs
            ))));
        }

        validate_identifier(&self.store.users_table)?;
        validate_identifier(&self.store.email_column)?;
        validate_identifier(&self.store.password_column)?;
        Ok(())
    }
}
