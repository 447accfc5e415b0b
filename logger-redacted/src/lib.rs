//! Tracing setup with automatic secret redaction
//!
//! Authentication code handles passwords, hashes and account emails; none
//! of them may reach a log sink in clear. This crate installs the
//! `tracing` subscriber and runs every formatted event through
//! [`SecretRedactor`] on its way out.
//!
//! # Redacted Data Types
//!
//! - **Email Addresses**: user@example.com → EMAIL[<fingerprint>]
//! - **bcrypt Hashes**: $2b$12$... → [REDACTED]
//! - **Password Pairs**: password=hunter2 / "password":"..." → password=[REDACTED]
//! - **Bearer Tokens**: Bearer eyJ... → Bearer [REDACTED]
//! - **Custom Patterns**: configurable regex/replacement pairs
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{fingerprint, init_tracing, LoggerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing(&LoggerConfig::default())?;
//!
//!     // Correlate by fingerprint instead of logging the account.
//!     tracing::info!(email = %fingerprint("user@example.com"), "credentials verified");
//!
//!     // Caught by the redactor even if someone slips.
//!     tracing::warn!("bad form body: password=hunter22");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;
