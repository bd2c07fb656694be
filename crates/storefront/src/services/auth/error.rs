//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::notifier::DeliveryError;

/// Errors that can occur during authentication operations.
///
/// Every variant is returned before any state changes, so a failed call
/// leaves the store exactly as it was.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input other than the email (name, password length).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] freshco_core::EmailError),

    /// Invalid mobile number format.
    #[error("invalid mobile number: {0}")]
    InvalidMobile(#[from] freshco_core::MobileError),

    /// No account or in-flight flow exists for the email.
    #[error("no account found for this email")]
    NotFound,

    /// The password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but its email has not been verified yet.
    #[error("email not verified")]
    NotVerified,

    /// The email or mobile number is already registered or awaiting
    /// verification.
    #[error("an account with this email or mobile number already exists")]
    Duplicate,

    /// No live code, a code issued for something else, or a wrong value.
    #[error("invalid code")]
    InvalidCode,

    /// The code was correct in form but its validity window has passed.
    #[error("code expired")]
    ExpiredCode,

    /// The code could not be delivered.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Flat classification of [`AuthError`] for presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    Validation,
    NotFound,
    InvalidCredentials,
    NotVerified,
    Duplicate,
    InvalidCode,
    ExpiredCode,
    Delivery,
    Internal,
}

impl AuthError {
    /// Which category of failure this is.
    #[must_use]
    pub const fn kind(&self) -> AuthErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidEmail(_) | Self::InvalidMobile(_) => {
                AuthErrorKind::Validation
            }
            Self::NotFound => AuthErrorKind::NotFound,
            Self::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            Self::NotVerified => AuthErrorKind::NotVerified,
            Self::Duplicate => AuthErrorKind::Duplicate,
            Self::InvalidCode => AuthErrorKind::InvalidCode,
            Self::ExpiredCode => AuthErrorKind::ExpiredCode,
            Self::Delivery(_) => AuthErrorKind::Delivery,
            Self::Repository(_) | Self::PasswordHash => AuthErrorKind::Internal,
        }
    }
}
