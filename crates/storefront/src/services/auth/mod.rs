//! Authentication service.
//!
//! Owns the one-time code lifecycle: registration with email verification,
//! password login, and password reset. Codes go to the account's email and,
//! when the account has a mobile number, by SMS as well. Session bookkeeping (who is signed in,
//! persistence, change notification) lives in
//! [`SessionStore`](crate::stores::SessionStore), which wraps this service.

mod error;

pub use error::{AuthError, AuthErrorKind};

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

use freshco_core::{CodePurpose, Email, IdentityId, Mobile};

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::db::{CodeRepository, RepositoryError, UserRepository};
use crate::models::{Identity, IdentityRecord, OneTimeCode, PendingRegistration};
use crate::services::notifier::{Destination, Notifier};

/// Receipt for a freshly issued code. Never carries the code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub email: Email,
    pub purpose: CodePurpose,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Source of fresh code values.
pub type CodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Authentication service.
///
/// Every operation validates first, then delivers any code, and only then
/// writes, so a failure at any step leaves the repositories untouched.
pub struct AuthService<U, C, N> {
    users: Arc<U>,
    codes: Arc<C>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
    generate: CodeGenerator,
}

impl<U, C, N> AuthService<U, C, N>
where
    U: UserRepository,
    C: CodeRepository,
    N: Notifier,
{
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        codes: Arc<C>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            codes,
            notifier,
            clock,
            config,
            generate: Arc::new(generate_code),
        }
    }

    /// Replace the random code source.
    #[must_use]
    pub fn with_code_generator(mut self, generate: CodeGenerator) -> Self {
        self.generate = generate;
        self
    }

    /// Get a reference to the auth configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get a reference to the delivery channel.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Start a registration and send its verification code.
    ///
    /// The mobile number is optional; a blank one counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for an empty name or short password.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidMobile` unless the mobile is ten digits.
    /// Returns `AuthError::Duplicate` if the email or mobile number is
    /// registered or pending.
    /// Returns `AuthError::Delivery` if the code could not be sent.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        mobile: Option<&str>,
        password: &str,
    ) -> Result<IssuedCode, AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        let mobile = mobile
            .filter(|m| !m.trim().is_empty())
            .map(Mobile::parse)
            .transpose()?;
        validate_password(password, self.config.min_password_length)?;

        if self.users.find_identity(&email).await?.is_some()
            || self.users.find_pending(&email).await?.is_some()
        {
            return Err(AuthError::Duplicate);
        }
        if let Some(mobile) = &mobile
            && self.users.mobile_in_use(mobile).await?
        {
            return Err(AuthError::Duplicate);
        }

        let password_hash = hash_password(password)?;
        let now = self.clock.now();
        let code = self
            .deliver_code(
                &email,
                mobile.as_ref(),
                CodePurpose::RegistrationVerification,
                now,
            )
            .await?;

        self.users
            .insert_pending(PendingRegistration {
                email: email.clone(),
                name,
                mobile,
                password_hash,
                created_at: now,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::Duplicate,
                other => AuthError::Repository(other),
            })?;

        let issued = receipt(&code);
        if let Err(e) = self.codes.put(code).await {
            self.users.take_pending(&email).await?;
            return Err(e.into());
        }

        tracing::info!(email = %email, "Registration pending verification");
        Ok(issued)
    }

    /// Confirm a registration with its code and create the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCode` if there is no live registration code
    /// or the value does not match.
    /// Returns `AuthError::ExpiredCode` if the code has expired; the code is
    /// discarded.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        self.check_code(&email, code, CodePurpose::RegistrationVerification)
            .await?;

        let pending = self
            .users
            .find_pending(&email)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        let now = self.clock.now();
        let identity = Identity {
            id: IdentityId::new(uuid::Uuid::new_v4().to_string()),
            name: pending.name,
            email: email.clone(),
            mobile: pending.mobile,
            verified: true,
        };

        self.users
            .insert_identity(IdentityRecord {
                identity: identity.clone(),
                password_hash: pending.password_hash,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::Duplicate,
                other => AuthError::Repository(other),
            })?;

        self.codes.delete(&email).await?;
        self.users.take_pending(&email).await?;

        tracing::info!(email = %email, identity_id = %identity.id, "Email verified");
        Ok(identity)
    }

    /// Issue a fresh code for whatever flow is in flight for the email.
    ///
    /// The new code replaces the old one, never repeats its value, and
    /// restarts the validity window.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if no registration or reset is in flight.
    /// Returns `AuthError::Delivery` if the code could not be sent.
    pub async fn resend_otp(&self, email: &str) -> Result<IssuedCode, AuthError> {
        let email = Email::parse(email)?;

        let purpose = match self.codes.find(&email).await? {
            Some(live) => live.purpose,
            None if self.users.find_pending(&email).await?.is_some() => {
                CodePurpose::RegistrationVerification
            }
            None => return Err(AuthError::NotFound),
        };
        let mobile = match purpose {
            CodePurpose::RegistrationVerification => self
                .users
                .find_pending(&email)
                .await?
                .and_then(|p| p.mobile),
            CodePurpose::PasswordReset => self
                .users
                .find_identity(&email)
                .await?
                .and_then(|r| r.identity.mobile),
        };

        let code = self
            .deliver_code(&email, mobile.as_ref(), purpose, self.clock.now())
            .await?;
        let issued = receipt(&code);
        self.codes.put(code).await?;

        tracing::info!(email = %email, %purpose, "Code re-issued");
        Ok(issued)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Check credentials and return the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if nothing is registered for the email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    /// Returns `AuthError::NotVerified` if the registration was never verified.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;

        if let Some(record) = self.users.find_identity(&email).await? {
            verify_password(password, &record.password_hash)?;
            if !record.identity.verified {
                return Err(AuthError::NotVerified);
            }
            tracing::info!(email = %email, identity_id = %record.identity.id, "Logged in");
            return Ok(record.identity);
        }

        match self.users.find_pending(&email).await? {
            Some(pending) => {
                verify_password(password, &pending.password_hash)?;
                Err(AuthError::NotVerified)
            }
            None => Err(AuthError::NotFound),
        }
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Send a password reset code to a verified identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if no verified identity has this email.
    /// Returns `AuthError::Delivery` if the code could not be sent.
    pub async fn forgot_password(&self, email: &str) -> Result<IssuedCode, AuthError> {
        let email = Email::parse(email)?;

        let mobile = match self.users.find_identity(&email).await? {
            Some(record) if record.identity.verified => record.identity.mobile,
            _ => return Err(AuthError::NotFound),
        };

        let code = self
            .deliver_code(
                &email,
                mobile.as_ref(),
                CodePurpose::PasswordReset,
                self.clock.now(),
            )
            .await?;
        let issued = receipt(&code);
        self.codes.put(code).await?;

        tracing::info!(email = %email, "Password reset requested");
        Ok(issued)
    }

    /// Replace the password using a reset code. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the new password is too short.
    /// Returns `AuthError::InvalidCode` / `AuthError::ExpiredCode` as for
    /// [`verify_otp`](Self::verify_otp), but only reset codes are accepted.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(new_password, self.config.min_password_length)?;
        self.check_code(&email, code, CodePurpose::PasswordReset)
            .await?;

        let password_hash = hash_password(new_password)?;
        self.users
            .update_password(&email, password_hash, self.clock.now())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::NotFound,
                other => AuthError::Repository(other),
            })?;
        self.codes.delete(&email).await?;

        tracing::info!(email = %email, "Password reset");
        Ok(())
    }

    // =========================================================================
    // Resend countdown
    // =========================================================================

    /// Time left before a resend should be offered for the email's live code.
    ///
    /// `None` when there is no live code or the cooldown has passed. This is
    /// advisory; [`resend_otp`](Self::resend_otp) never enforces it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or a repository error.
    pub async fn resend_available_in(
        &self,
        email: &str,
    ) -> Result<Option<std::time::Duration>, AuthError> {
        let email = Email::parse(email)?;
        let Some(live) = self.codes.find(&email).await? else {
            return Ok(None);
        };

        let cooldown = TimeDelta::from_std(self.config.resend_cooldown).unwrap_or(TimeDelta::MAX);
        let ready_at = live
            .issued_at
            .checked_add_signed(cooldown)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok((ready_at - self.clock.now())
            .to_std()
            .ok()
            .filter(|remaining| !remaining.is_zero()))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Validate a presented code against the live one without consuming it.
    async fn check_code(
        &self,
        email: &Email,
        candidate: &str,
        purpose: CodePurpose,
    ) -> Result<(), AuthError> {
        let live = match self.codes.find(email).await? {
            Some(live) if live.purpose == purpose => live,
            _ => return Err(AuthError::InvalidCode),
        };

        if live.is_expired(self.clock.now()) {
            self.codes.delete(email).await?;
            tracing::debug!(email = %email, %purpose, "Expired code discarded");
            return Err(AuthError::ExpiredCode);
        }

        if !live.matches(candidate) {
            return Err(AuthError::InvalidCode);
        }

        Ok(())
    }

    /// Generate and deliver a code. The caller stores it once delivery succeeded.
    ///
    /// The value always differs from the email's live code, so a replaced
    /// code can never verify again.
    async fn deliver_code(
        &self,
        email: &Email,
        mobile: Option<&Mobile>,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<OneTimeCode, AuthError> {
        let previous = self.codes.find(email).await?.map(|live| live.code);
        let value = loop {
            let candidate = (self.generate)();
            if previous.as_deref() != Some(candidate.as_str()) {
                break candidate;
            }
        };

        let ttl = TimeDelta::from_std(self.config.code_ttl).unwrap_or(TimeDelta::MAX);
        let code = OneTimeCode {
            email: email.clone(),
            code: value,
            purpose,
            issued_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let destinations = std::iter::once(Destination::from(email))
            .chain(mobile.map(Destination::from));
        for destination in destinations {
            self.notifier.deliver(&destination, &code.code, purpose).await?;
        }
        Ok(code)
    }
}

fn receipt(code: &OneTimeCode) -> IssuedCode {
    IssuedCode {
        email: code.email.clone(),
        purpose: code.purpose,
        issued_at: code.issued_at,
        expires_at: code.expires_at,
    }
}

/// Generate a six-digit code in `100000..=999999`.
#[must_use]
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

/// Validate a display name, returning it trimmed.
fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("name is required".to_owned()));
    }
    Ok(name.to_owned())
}

/// Validate password requirements.
fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::Validation(format!(
            "password must be at least {min_length} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
