use crate::{config::StoreSettings, error::*, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::Path;

lazy_static! {
    static ref SQL_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap();
}

/// Read-only access to account records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up an account by an already-lowercased email.
    ///
    /// Must behave case-insensitively for keys that are lowercase.
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<UserRecord>>;
}

/// In-memory store for development and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads accounts from a JSON file holding an array of row objects.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, invalid JSON or rows missing the configured
    /// email/password columns.
    pub fn from_json_file(path: impl AsRef<Path>, columns: &RecordColumns) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rows: Vec<Value> = serde_json::from_str(&contents)?;

        let store = Self::new();
        for row in rows {
            store.insert(UserRecord::from_row(row, columns)?);
        }
        Ok(store)
    }

    /// Inserts or replaces an account, keyed by its lowercased email.
    pub fn insert(&self, record: UserRecord) -> Option<UserRecord> {
        self.users.insert(record.email.to_lowercase(), record)
    }

    pub fn remove(&self, email: &str) -> Option<UserRecord> {
        self.users.remove(&email.to_lowercase()).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .get(normalized_email)
            .map(|entry| entry.value().clone()))
    }
}

/// Postgres-backed store.
///
/// Rows are fetched whole as JSON so that every column other than the
/// password hash reaches the identity unchanged.
pub struct PgUserStore {
    pool: PgPool,
    query: String,
    columns: RecordColumns,
}

impl PgUserStore {
    /// # Errors
    ///
    /// Fails when the table or a column name is not a plain SQL identifier.
    pub fn new(pool: PgPool, table: &str, columns: RecordColumns) -> Result<Self> {
        validate_identifier(&columns.password)?;
        let query = lookup_query(table, &columns.email)?;
        Ok(Self { pool, query, columns })
    }

    /// Opens a pool from settings.
    ///
    /// # Errors
    ///
    /// Fails when no database URL is configured, the identifiers are
    /// invalid, or the connection cannot be established.
    pub async fn connect(settings: &StoreSettings) -> Result<Self> {
        let url = settings.database_url.as_deref().ok_or_else(|| {
            CredentialsError::Config(config::ConfigError::NotFound(
                "store.database_url".to_string(),
            ))
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(url)
            .await?;

        tracing::info!(table = %settings.users_table, "connected user store");
        Self::new(pool, &settings.users_table, settings.columns())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<UserRecord>> {
        let row: Option<String> = sqlx::query_scalar(&self.query)
            .bind(normalized_email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(json) => {
                let value: Value = serde_json::from_str(&json)?;
                UserRecord::from_row(value, &self.columns).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Ensures `name` can be spliced into SQL without quoting.
///
/// # Errors
///
/// Returns [`CredentialsError::InvalidIdentifier`] otherwise.
pub fn validate_identifier(name: &str) -> Result<()> {
    if SQL_IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(CredentialsError::InvalidIdentifier(name.to_string()))
    }
}

/// The single-row lookup used by [`PgUserStore`].
///
/// # Errors
///
/// Fails when `table` or `email_column` is not a plain SQL identifier.
pub fn lookup_query(table: &str, email_column: &str) -> Result<String> {
    validate_identifier(table)?;
    validate_identifier(email_column)?;
    Ok(format!(
        "SELECT to_jsonb(u)::text FROM {table} u WHERE lower(u.{email_column}) = $1 LIMIT 1"
    ))
}
