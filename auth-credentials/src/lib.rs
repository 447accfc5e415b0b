//! Email/password credential verification for Credgate
//!
//! This crate provides the credentials sign-in path:
//! - Schema validation of untyped sign-in payloads
//! - Case-insensitive account lookup through a pluggable user store
//! - bcrypt password comparison with a decoy hash for unknown accounts
//! - Projection of the account into token and session payloads
//! - Provider registration and a sign-in entry point for web layers
//!
//! Every credential failure collapses to the same rejection. Only
//! infrastructure faults (store down, corrupt rows) surface as errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_credentials::{
//!     AuthSettings, Authenticator, BcryptComparator, CredentialVerifier, CredentialsProvider,
//!     PgUserStore, ProviderRegistry,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = AuthSettings::load(None)?;
//!     let store = Arc::new(PgUserStore::connect(&settings.store).await?);
//!     let comparator = Arc::new(BcryptComparator::new(settings.hashing.cost)?);
//!
//!     let mut providers = ProviderRegistry::new();
//!     providers.register(Arc::new(CredentialsProvider::new(CredentialVerifier::new(
//!         store, comparator,
//!     ))))?;
//!
//!     let auth = Authenticator::from_settings(&settings, providers);
//!     let outcome = auth
//!         .sign_in(
//!             "credentials",
//!             &serde_json::json!({ "email": "User@Example.com", "password": "secret1" }),
//!             chrono::Utc::now(),
//!         )
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod callbacks;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hashing;
pub mod models;
pub mod provider;
pub mod repository;
pub mod service;
pub mod validation;

pub use callbacks::*;
pub use crate::config::{
    AuthPages, AuthSettings, HashingSettings, SessionSettings, StoreSettings, MAX_SESSION_AGE_SECS,
};
pub use error::*;
pub use handlers::*;
pub use hashing::*;
pub use models::*;
pub use provider::*;
pub use repository::*;
pub use service::*;
pub use validation::{parse_credentials, ValidCredentials, ValidationFailure, MIN_PASSWORD_LENGTH};
