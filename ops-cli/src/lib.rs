//! Operator CLI for credential management
//!
//! # Example Usage
//!
//! ```bash
//! # Produce a bcrypt hash to seed a users table or JSON file
//! credctl hash-password --cost 12
//!
//! # Try a sign-in against Postgres (DATABASE_URL / AUTH__STORE__DATABASE_URL)
//! credctl verify --email admin@example.com
//!
//! # Try a sign-in against a JSON seed file
//! credctl verify --email admin@example.com --users-file users.json
//!
//! # Print effective settings, secrets omitted
//! credctl --config credgate.toml show-config
//! ```

use anyhow::{bail, Context, Result};
use auth_credentials::{
    validation::meets_min_length, AuthSettings, Authenticator, BcryptComparator, CredentialVerifier,
    CredentialsProvider, InMemoryUserStore, PgUserStore, ProviderRegistry, SignInOutcome,
    UserStore, CREDENTIALS_PROVIDER_ID, MIN_PASSWORD_LENGTH,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "credctl")]
#[command(about = "Hash passwords and try credential sign-ins", version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CREDCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hash a password for seeding a user store
    HashPassword {
        /// bcrypt cost, defaults to `hashing.cost`
        #[arg(long)]
        cost: Option<u32>,
    },

    /// Run a credentials sign-in and print the outcome
    Verify {
        #[arg(long)]
        email: String,

        /// JSON array of user rows to use instead of Postgres
        #[arg(long)]
        users_file: Option<PathBuf>,

        /// Password, prompted for when absent
        #[arg(long, env = "CREDCTL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print the effective settings with secrets omitted
    ShowConfig,
}

/// Loads settings, installs logging and runs the chosen command.
///
/// # Errors
///
/// Any configuration, store or I/O failure.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = AuthSettings::load(cli.config.as_deref()).context("loading settings")?;

    let logging = if cli.verbose {
        settings.logging.clone().verbose()
    } else {
        settings.logging.clone()
    };
    logger_redacted::init_tracing(&logging)?;

    match cli.command {
        Command::HashPassword { cost } => {
            let password = prompt_password(true)?;
            let hash = hash_password(&password, cost.unwrap_or(settings.hashing.cost))?;
            println!("{hash}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            email,
            users_file,
            password,
        } => {
            let password = match password {
                Some(password) => SecretString::new(password),
                None => prompt_password(false)?,
            };
            let store = build_store(&settings, users_file.as_deref()).await?;
            let outcome = sign_in(&settings, store, &email, &password).await?;

            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if outcome.is_authenticated() {
                eprintln!("{}", "credentials accepted".green());
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{}", "invalid credentials".red());
                Ok(ExitCode::from(1))
            }
        }
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn prompt_password(confirm: bool) -> Result<SecretString> {
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(SecretString::new(prompt.interact()?))
}

/// Hashes `password` at `cost`, refusing passwords sign-in would reject.
///
/// # Errors
///
/// Fails for short passwords or an invalid cost.
pub fn hash_password(password: &SecretString, cost: u32) -> Result<String> {
    if !meets_min_length(password) {
        bail!("password must be at least {MIN_PASSWORD_LENGTH} characters");
    }
    let comparator = BcryptComparator::new(cost)?;
    Ok(comparator.hash(password.expose_secret())?)
}

/// Seed file when given, Postgres otherwise.
///
/// # Errors
///
/// Fails when the file cannot be loaded or the database is unreachable.
pub async fn build_store(
    settings: &AuthSettings,
    users_file: Option<&Path>,
) -> Result<Arc<dyn UserStore>> {
    match users_file {
        Some(path) => {
            let store = InMemoryUserStore::from_json_file(path, &settings.store.columns())
                .with_context(|| format!("loading users from {}", path.display()))?;
            tracing::debug!(users = store.len(), "loaded user seed file");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(PgUserStore::connect(&settings.store).await?)),
    }
}

/// Runs one credentials sign-in against `store`.
///
/// # Errors
///
/// Infrastructure faults only; rejections are an `Ok` outcome.
pub async fn sign_in(
    settings: &AuthSettings,
    store: Arc<dyn UserStore>,
    email: &str,
    password: &SecretString,
) -> Result<SignInOutcome> {
    let comparator = Arc::new(BcryptComparator::new(settings.hashing.cost)?);
    let verifier = CredentialVerifier::new(store, comparator);

    let mut providers = ProviderRegistry::new();
    providers.register(Arc::new(CredentialsProvider::new(verifier)))?;
    let authenticator = Authenticator::from_settings(settings, providers);

    let payload = serde_json::json!({
        "email": email,
        "password": password.expose_secret(),
    });
    Ok(authenticator
        .sign_in(CREDENTIALS_PROVIDER_ID, &payload, chrono::Utc::now())
        .await?)
}
