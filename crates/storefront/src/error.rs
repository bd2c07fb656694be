//! Unified error type for callers that drive several stores at once.
//!
//! Each store and service has its own error enum; `AppError` wraps them so a
//! front end can hold one `Result` type and ask for a message that is safe to
//! show a shopper.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::{AuthError, AuthErrorKind};
use crate::services::catalog::CatalogError;
use crate::services::checkout::CheckoutError;
use crate::stores::CartError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

impl AppError {
    /// A message suitable for showing to the shopper.
    ///
    /// Storage and configuration details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Repository(_) => "Something went wrong, please try again".to_string(),
            Self::Auth(err) => match err.kind() {
                AuthErrorKind::Validation => err.to_string(),
                AuthErrorKind::NotFound => "No account found for this email".to_string(),
                AuthErrorKind::InvalidCredentials => "Invalid email or password".to_string(),
                AuthErrorKind::NotVerified => "Please verify your email first".to_string(),
                AuthErrorKind::Duplicate => {
                    "An account with this email or mobile number already exists".to_string()
                }
                AuthErrorKind::InvalidCode => "Invalid verification code".to_string(),
                AuthErrorKind::ExpiredCode => {
                    "This code has expired, please request a new one".to_string()
                }
                AuthErrorKind::Delivery => "We couldn't send your code, please try again".to_string(),
                AuthErrorKind::Internal => "Authentication error".to_string(),
            },
            Self::Catalog(CatalogError::Repository(_))
            | Self::Checkout(CheckoutError::Repository(_)) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Cart(err) => err.to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(AuthError::InvalidCode);
        assert_eq!(err.to_string(), "Auth error: invalid code");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cart is empty");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::from(RepositoryError::Backend("lock poisoned".to_string()));
        assert!(!err.user_message().contains("lock"));

        let err = AppError::from(AuthError::Repository(RepositoryError::Backend(
            "lock poisoned".to_string(),
        )));
        assert_eq!(err.user_message(), "Authentication error");

        let err = AppError::from(CheckoutError::Repository(RepositoryError::NotFound));
        assert!(!err.user_message().contains("not found"));
    }

    #[test]
    fn test_user_message_auth_kinds() {
        assert_eq!(
            AppError::from(AuthError::ExpiredCode).user_message(),
            "This code has expired, please request a new one"
        );
        assert_eq!(
            AppError::from(AuthError::Validation("name is required".to_string())).user_message(),
            "validation failed: name is required"
        );
    }
}
