use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref BCRYPT_REGEX: Regex = Regex::new(r"\$2[abxy]?\$\d{2}\$[./A-Za-z0-9]{53}").unwrap();
    static ref BEARER_REGEX: Regex = Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*").unwrap();
    static ref PASSWORD_PAIR_REGEX: Regex = Regex::new(
        r#"(?i)("?\b(?:password|passwd|pwd|password_hash|passwordHash)"?\s*[:=]\s*)("[^"]*"|[^\s,&}]+)"#
    )
    .unwrap();
}

/// Placeholder written in place of secrets that must never be correlated.
pub const REDACTED: &str = "[REDACTED]";

/// Secret redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_password_hashes: bool,
    pub redact_bearer_tokens: bool,
    pub redact_password_pairs: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_password_hashes: true,
            redact_bearer_tokens: true,
            redact_password_pairs: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// Scrubs credentials and account identifiers out of log text.
#[derive(Debug, Clone, Default)]
pub struct SecretRedactor {
    config: RedactionConfig,
}

impl SecretRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Pairs first, so a hash inside `password=...` goes as a whole.
        if self.config.redact_password_pairs {
            result = PASSWORD_PAIR_REGEX
                .replace_all(&result, |caps: &Captures| format!("{}{REDACTED}", &caps[1]))
                .into_owned();
        }

        if self.config.redact_password_hashes {
            result = BCRYPT_REGEX.replace_all(&result, REDACTED).into_owned();
        }

        if self.config.redact_bearer_tokens {
            result = BEARER_REGEX
                .replace_all(&result, format!("Bearer {REDACTED}").as_str())
                .into_owned();
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    format!("EMAIL[{}]", fingerprint(&email.to_lowercase()))
                } else {
                    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
                    let first = |s: &str| s.chars().next().map(String::from).unwrap_or_default();
                    format!("{}***@{}***", first(local), first(domain))
                }
            })
            .into_owned()
    }
}

/// Short, stable correlation tag for a sensitive value.
///
/// The same input always yields the same tag, so log lines about one
/// account can be grouped without the account appearing in clear.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "$2b$04$abcdefghijklmnopqrstuuFFqz3e6VvD0GhuvSyqlUoDzrJxVNaW2";

    #[test]
    fn test_email_redaction() {
        let redactor = SecretRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        });

        let redacted = redactor.redact("User john.doe@example.com signed in");
        assert!(redacted.contains("j***@e***"));
        assert!(!redacted.contains("john.doe"));
    }

    #[test]
    fn test_email_correlation_is_case_insensitive() {
        let redactor = SecretRedactor::default();
        let lower = redactor.redact("a@example.com");
        let upper = redactor.redact("A@Example.com");

        assert!(lower.starts_with("EMAIL["));
        assert_eq!(lower, upper);
        assert_eq!(lower, format!("EMAIL[{}]", fingerprint("a@example.com")));
    }

    #[test]
    fn test_bcrypt_hash_redaction() {
        let redacted = SecretRedactor::default().redact(&format!("loaded row hash={HASH} ok"));
        assert!(!redacted.contains("$2b$04$"));
        assert!(redacted.contains(REDACTED));
    }

    #[test]
    fn test_password_pair_redaction() {
        let redactor = SecretRedactor::default();

        let json = redactor.redact(r#"{"email_verified":true,"password":"hunter22"}"#);
        assert_eq!(json, format!(r#"{{"email_verified":true,"password":{REDACTED}}}"#));

        let form = redactor.redact("password=hunter22&remember=1");
        assert_eq!(form, format!("password={REDACTED}&remember=1"));

        let field = redactor.redact(&format!("passwordHash: {HASH}"));
        assert_eq!(field, format!("passwordHash: {REDACTED}"));
    }

    #[test]
    fn test_bearer_token_redaction() {
        let redacted = SecretRedactor::default().redact("Authorization: Bearer eyJhbGciOi.x.y");
        assert_eq!(redacted, format!("Authorization: Bearer {REDACTED}"));
    }

    #[test]
    fn test_custom_patterns() {
        let redactor = SecretRedactor::new(RedactionConfig {
            custom_patterns: vec![(Regex::new(r"\bsess_[a-z0-9]+").unwrap(), "sess_[REDACTED]".to_string())],
            ..Default::default()
        });
        assert_eq!(redactor.redact("cookie sess_abc123"), "cookie sess_[REDACTED]");
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("a@b.com"), fingerprint("a@b.com"));
        assert_ne!(fingerprint("a@b.com"), fingerprint("c@d.com"));
        assert_eq!(fingerprint("a@b.com").len(), 11);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "credentials rejected: unknown account";
        assert_eq!(SecretRedactor::default().redact(text), text);
    }
}
