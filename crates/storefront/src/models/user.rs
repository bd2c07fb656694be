//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshco_core::{CodePurpose, Email, IdentityId, Mobile};

/// A signed-in-capable account, as seen by presentation code.
///
/// This is also what gets persisted as the current session, so it must never
/// carry credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identity ID.
    pub id: IdentityId,
    /// Display name.
    pub name: String,
    /// Email address (unique among identities).
    pub email: Email,
    /// Mobile number (unique among identities when present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Mobile>,
    /// Whether the email has been verified. Only verified identities can log in.
    pub verified: bool,
}

/// An identity together with its stored credential.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    /// The public identity.
    pub identity: Identity,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
    /// When the credential was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A registration waiting for its verification code.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    /// Email being registered (key).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Mobile number, if one was given. Codes are also sent here by SMS.
    pub mobile: Option<Mobile>,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// When the registration was requested.
    pub created_at: DateTime<Utc>,
}

/// A live one-time code. At most one exists per email.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    /// Email the code was issued to (key).
    pub email: Email,
    /// Six ASCII digits.
    pub code: String,
    /// What the code authorizes.
    pub purpose: CodePurpose,
    /// When the code was issued.
    pub issued_at: DateTime<Utc>,
    /// Last instant at which the code is still accepted.
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Whether the code has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether `candidate` matches this code.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        // Constant-time over equal-length inputs.
        let candidate = candidate.trim().as_bytes();
        let expected = self.code.as_bytes();
        candidate.len() == expected.len()
            && candidate
                .iter()
                .zip(expected)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneTimeCode")
            .field("email", &self.email)
            .field("code", &"[REDACTED]")
            .field("purpose", &self.purpose)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn code_at(now: DateTime<Utc>) -> OneTimeCode {
        OneTimeCode {
            email: Email::parse("jane@x.com").unwrap(),
            code: "123456".to_string(),
            purpose: CodePurpose::RegistrationVerification,
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let code = code_at(now);
        assert!(!code.is_expired(now + Duration::minutes(10)));
        assert!(code.is_expired(now + Duration::minutes(10) + Duration::milliseconds(1)));
    }

    #[test]
    fn test_matches() {
        let code = code_at(Utc::now());
        assert!(code.matches("123456"));
        assert!(code.matches(" 123456 "));
        assert!(!code.matches("123457"));
        assert!(!code.matches("12345"));
        assert!(!code.matches(""));
    }

    #[test]
    fn test_debug_redacts_code() {
        let code = code_at(Utc::now());
        let debug = format!("{code:?}");
        assert!(!debug.contains("123456"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_identity_json_has_no_credentials() {
        let identity = Identity {
            id: IdentityId::new("1"),
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@x.com").unwrap(),
            mobile: Some(Mobile::parse("9876543210").unwrap()),
            verified: true,
        };
        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("password"));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn test_identity_without_mobile_still_loads() {
        let json = r#"{"id":"1","name":"Jane","email":"jane@x.com","verified":true}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.mobile, None);
        assert!(!serde_json::to_string(&identity).unwrap().contains("mobile"));
    }
}
