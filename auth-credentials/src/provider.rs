//! Sign-in providers and their registry.

use crate::{error::*, models::Identity, service::CredentialVerifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Id under which [`CredentialsProvider`] registers by default.
pub const CREDENTIALS_PROVIDER_ID: &str = "credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Credentials,
    OAuth,
}

/// Common trait for all sign-in providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn id(&self) -> &str;

    fn kind(&self) -> ProviderKind;

    /// Turns a sign-in payload into an identity, or `None` on rejection.
    async fn authorize(&self, credentials: &Value) -> Result<Option<Identity>>;
}

/// Email/password provider backed by a [`CredentialVerifier`].
pub struct CredentialsProvider {
    id: String,
    verifier: CredentialVerifier,
}

impl CredentialsProvider {
    pub fn new(verifier: CredentialVerifier) -> Self {
        Self::with_id(CREDENTIALS_PROVIDER_ID, verifier)
    }

    pub fn with_id(id: impl Into<String>, verifier: CredentialVerifier) -> Self {
        Self {
            id: id.into(),
            verifier,
        }
    }
}

#[async_trait]
impl AuthProvider for CredentialsProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Credentials
    }

    async fn authorize(&self, credentials: &Value) -> Result<Option<Identity>> {
        self.verifier.verify(credentials).await
    }
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn AuthProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`CredentialsError::DuplicateProvider`] if the id is taken.
    pub fn register(&mut self, provider: Arc<dyn AuthProvider>) -> Result<()> {
        let id = provider.id().to_string();
        if self.providers.contains_key(&id) {
            return Err(CredentialsError::DuplicateProvider(id));
        }
        tracing::debug!(provider = %id, kind = ?provider.kind(), "registered auth provider");
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn AuthProvider>> {
        self.providers.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
