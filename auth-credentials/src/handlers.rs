// Sign-in entry point for a web layer: picks a provider, runs it, and
// turns the identity into token and session payloads.

use crate::{
    callbacks::*,
    config::{AuthPages, AuthSettings},
    error::*,
    provider::ProviderRegistry,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// Error code appended to the sign-in page on any credential rejection.
pub const CREDENTIALS_SIGNIN_ERROR: &str = "CredentialsSignin";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignInOutcome {
    Authenticated {
        token: TokenPayload,
        session: SessionPayload,
    },
    Rejected {
        redirect: String,
    },
}

impl SignInOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

pub struct Authenticator {
    pages: AuthPages,
    providers: ProviderRegistry,
    session_max_age: Duration,
}

impl Authenticator {
    pub fn new(pages: AuthPages, providers: ProviderRegistry, session_max_age: Duration) -> Self {
        Self {
            pages,
            providers,
            session_max_age,
        }
    }

    pub fn from_settings(settings: &AuthSettings, providers: ProviderRegistry) -> Self {
        Self::new(settings.pages.clone(), providers, settings.session.max_age())
    }

    /// Runs `provider_id` against `credentials`.
    ///
    /// Every rejection produces the same redirect back to the sign-in page.
    ///
    /// # Errors
    ///
    /// [`CredentialsError::UnknownProvider`] for an unregistered id,
    /// [`CredentialsError::SessionExpiry`] when `now` plus the session age
    /// is not representable, plus any infrastructure fault from the provider.
    pub async fn sign_in(
        &self,
        provider_id: &str,
        credentials: &Value,
        now: DateTime<Utc>,
    ) -> Result<SignInOutcome> {
        let provider = self
            .providers
            .get(provider_id)
            .ok_or_else(|| CredentialsError::UnknownProvider(provider_id.to_string()))?;

        let Some(user) = provider.authorize(credentials).await? else {
            return Ok(SignInOutcome::Rejected {
                redirect: self.rejection_redirect(),
            });
        };

        let expires = now
            .checked_add_signed(self.session_max_age)
            .ok_or(CredentialsError::SessionExpiry)?;

        let token = project_user_into_token(user);
        let session = project_token_into_session(&token, expires);
        Ok(SignInOutcome::Authenticated { token, session })
    }

    fn rejection_redirect(&self) -> String {
        let separator = if self.pages.sign_in.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}error={CREDENTIALS_SIGNIN_ERROR}",
            self.pages.sign_in
        )
    }
}
