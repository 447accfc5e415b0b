use crate::{error::*, hashing::HashComparator, models::*, repository::UserStore, validation::*};
use logger_redacted::fingerprint;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

/// Checks an email/password pair against the user store.
///
/// Stateless between calls; clones share the same store and comparator.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    comparator: Arc<dyn HashComparator>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>, comparator: Arc<dyn HashComparator>) -> Self {
        Self { store, comparator }
    }

    /// Verifies untyped credentials.
    ///
    /// Returns `Ok(None)` for every credential failure (malformed payload,
    /// unknown account, wrong password) so callers cannot tell them apart.
    /// Malformed payloads never reach the store. Unknown accounts are still
    /// compared against a decoy hash.
    ///
    /// # Errors
    ///
    /// Only infrastructure faults: the store failing or returning an
    /// unusable row, or the comparison task dying.
    pub async fn verify(&self, credentials: &Value) -> Result<Option<Identity>> {
        let credentials = match parse_credentials(credentials) {
            Ok(credentials) => credentials,
            Err(failure) => {
                tracing::debug!(reason = %failure, "credentials rejected: malformed input");
                return Ok(None);
            }
        };

        let email = credentials.normalized_email();
        let email_tag = fingerprint(&email);

        let record = self.store.find_by_email(&email).await?;

        let hash = match &record {
            Some(record) => record.password_hash.clone(),
            None => self.comparator.decoy_hash().to_string(),
        };
        let (_, password) = credentials.into_parts();
        let comparator = Arc::clone(&self.comparator);

        let matched = tokio::task::spawn_blocking(move || {
            comparator.matches(password.expose_secret(), &hash)
        })
        .await
        .map_err(|e| CredentialsError::TaskFailed(e.to_string()))?;

        match record {
            Some(record) if matched => {
                tracing::info!(email = %email_tag, "credentials verified");
                Ok(Some(record.into_identity()))
            }
            Some(_) => {
                tracing::debug!(email = %email_tag, "credentials rejected: password mismatch");
                Ok(None)
            }
            None => {
                tracing::debug!(email = %email_tag, "credentials rejected: unknown account");
                Ok(None)
            }
        }
    }
}
