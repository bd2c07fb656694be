//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults match the reference storefront.
//!
//! - `FRESHCO_CODE_TTL_SECS` - One-time code validity window (default: 600)
//! - `FRESHCO_RESEND_COOLDOWN_SECS` - Countdown before resend is offered (default: 60)
//! - `FRESHCO_MIN_PASSWORD_LENGTH` - Minimum password length (default: 6)
//! - `FRESHCO_SIMULATED_LATENCY_MS` - Artificial delay on auth calls (default: 0)
//! - `FRESHCO_CURRENCY` - Store currency (default: INR)
//! - `FRESHCO_DELIVERY_CHARGE` - Flat delivery charge (default: 50)
//! - `FRESHCO_SESSION_DIR` - Directory for file-backed session persistence
//!   (default: unset, sessions live in memory)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use freshco_core::{CurrencyCode, Price};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Session/identity store settings
    pub auth: AuthConfig,
    /// Cart pricing settings
    pub cart: CartConfig,
    /// Where the signed-in identity is persisted between runs
    pub session_dir: Option<PathBuf>,
}

/// Settings for the session/identity store.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long an issued one-time code stays valid
    pub code_ttl: Duration,
    /// Countdown shown before the UI offers to resend a code
    pub resend_cooldown: Duration,
    /// Minimum accepted password length, in characters
    pub min_password_length: usize,
    /// Delay applied to every auth call to mimic a remote backend
    pub simulated_latency: Duration,
}

/// Settings for the cart store.
#[derive(Debug, Clone, Copy)]
pub struct CartConfig {
    /// Currency every cart line must be priced in
    pub currency: CurrencyCode,
    /// Flat charge added once when the subtotal is non-zero
    pub delivery_charge: Decimal,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::from_secs(600),
            resend_cooldown: Duration::from_secs(60),
            min_password_length: 6,
            simulated_latency: Duration::ZERO,
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::INR,
            delivery_charge: Decimal::from(50),
        }
    }
}

impl CartConfig {
    /// The delivery charge as a price in the cart currency.
    #[must_use]
    pub const fn delivery_price(&self) -> Price {
        Price::new(self.delivery_charge, self.currency)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a present value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let auth = AuthConfig {
            code_ttl: Duration::from_secs(parse_or(
                &lookup,
                "FRESHCO_CODE_TTL_SECS",
                defaults.auth.code_ttl.as_secs(),
            )?),
            resend_cooldown: Duration::from_secs(parse_or(
                &lookup,
                "FRESHCO_RESEND_COOLDOWN_SECS",
                defaults.auth.resend_cooldown.as_secs(),
            )?),
            min_password_length: parse_or(
                &lookup,
                "FRESHCO_MIN_PASSWORD_LENGTH",
                defaults.auth.min_password_length,
            )?,
            simulated_latency: Duration::from_millis(parse_or(
                &lookup,
                "FRESHCO_SIMULATED_LATENCY_MS",
                0,
            )?),
        };

        if auth.code_ttl.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "FRESHCO_CODE_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cart = CartConfig {
            currency: parse_or(&lookup, "FRESHCO_CURRENCY", defaults.cart.currency)?,
            delivery_charge: parse_or(
                &lookup,
                "FRESHCO_DELIVERY_CHARGE",
                defaults.cart.delivery_charge,
            )?,
        };

        if cart.delivery_charge.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "FRESHCO_DELIVERY_CHARGE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let session_dir = lookup("FRESHCO_SESSION_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            auth,
            cart,
            session_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if present, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
