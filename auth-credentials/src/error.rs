use thiserror::Error;

/// Faults that are not credential failures.
///
/// Rejections (bad shape, unknown account, wrong password) never appear
/// here; they are reported as `Ok(None)` by the verifier.
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed user record: {0}")]
    MalformedRecord(String),

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session expiry is out of range")]
    SessionExpiry,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider already registered: {0}")]
    DuplicateProvider(String),
}

pub type Result<T> = std::result::Result<T, CredentialsError>;
