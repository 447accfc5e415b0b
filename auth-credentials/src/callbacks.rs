//! Projections from an authenticated identity into the payloads a session
//! or token issuer consumes. Signing and transport belong to the issuer.

use crate::models::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub data: Identity,
}

/// What the client sees as its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: Identity,
    pub expires: DateTime<Utc>,
}

pub fn project_user_into_token(user: Identity) -> TokenPayload {
    TokenPayload { data: user }
}

/// Re-issues a token: a freshly authenticated user replaces the carried
/// identity, otherwise the token is returned as-is.
pub fn refresh_token(token: TokenPayload, user: Option<Identity>) -> TokenPayload {
    match user {
        Some(user) => project_user_into_token(user),
        None => token,
    }
}

pub fn project_token_into_session(token: &TokenPayload, expires: DateTime<Utc>) -> SessionPayload {
    SessionPayload {
        user: token.data.clone(),
        expires,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;
    use chrono::TimeZone;
    use serde_json::json;

    fn identity(email: &str) -> Identity {
        UserRecord::new(email, "$2b$04$hash")
            .with_field("name", "Ada")
            .into_identity()
    }

    #[test]
    fn test_token_carries_identity() {
        let token = project_user_into_token(identity("a@b.com"));
        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            json!({ "data": { "email": "a@b.com", "name": "Ada" } })
        );
    }

    #[test]
    fn test_refresh_keeps_token_without_user() {
        let token = project_user_into_token(identity("a@b.com"));
        assert_eq!(refresh_token(token.clone(), None), token);
    }

    #[test]
    fn test_refresh_replaces_identity_with_new_user() {
        let token = project_user_into_token(identity("a@b.com"));
        let refreshed = refresh_token(token, Some(identity("c@d.com")));
        assert_eq!(refreshed.data.email, "c@d.com");
    }

    #[test]
    fn test_session_copies_token_identity() {
        let expires = Utc.with_ymd_and_hms(2026, 11, 14, 12, 0, 0).unwrap();
        let token = project_user_into_token(identity("a@b.com"));
        let session = project_token_into_session(&token, expires);

        assert_eq!(session.user, token.data);
        assert_eq!(session.expires, expires);
    }
}
