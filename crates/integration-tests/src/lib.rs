//! Integration tests for the Freshco storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p freshco-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flows` - Registration, verification, login, password reset
//! - `cart_checkout` - Cart arithmetic and placing orders
//!
//! Everything runs against in-memory repositories, a [`ManualClock`] and a
//! [`RecordingNotifier`], so no external services are needed.

use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;

use freshco_core::{CurrencyCode, Email, Mobile, Price, ProductId};
use freshco_storefront::clock::ManualClock;
use freshco_storefront::config::StorefrontConfig;
use freshco_storefront::models::{Product, ShippingDetails};
use freshco_storefront::services::RecordingNotifier;
use freshco_storefront::state::Storefront;

/// A storefront plus handles on its notifier and clock.
pub struct TestContext {
    pub storefront: Storefront<RecordingNotifier>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: ManualClock,
}

impl TestContext {
    /// A storefront with default configuration and in-memory sessions.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    /// A storefront with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be built.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = ManualClock::default();
        let storefront =
            Storefront::in_memory(config, Arc::clone(&notifier), Arc::new(clock.clone()))
                .unwrap_or_else(|e| panic!("failed to build storefront: {e}"));
        Self {
            storefront,
            notifier,
            clock,
        }
    }

    /// The most recent code delivered to `email`.
    ///
    /// # Panics
    ///
    /// Panics if the email is malformed or nothing was delivered to it.
    #[must_use]
    pub fn code_for(&self, email: &str) -> String {
        let email = Email::parse(email).unwrap_or_else(|e| panic!("bad email {email}: {e}"));
        self.notifier
            .last_code_for(&email)
            .unwrap_or_else(|| panic!("no code delivered to {email}"))
    }

    /// The most recent code sent by SMS to `mobile`.
    ///
    /// # Panics
    ///
    /// Panics if the number is malformed or nothing was sent to it.
    #[must_use]
    pub fn sms_code_for(&self, mobile: &str) -> String {
        let mobile = Mobile::parse(mobile).unwrap_or_else(|e| panic!("bad mobile {mobile}: {e}"));
        self.notifier
            .last_code_for(&mobile)
            .unwrap_or_else(|| panic!("no code sent to {mobile}"))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A minimal product priced in rupees.
#[must_use]
pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        unit_price: Price::new(Decimal::from(price), CurrencyCode::INR),
        original_price: None,
        image_ref: String::new(),
        category: "pulses".to_string(),
        weight_label: "1kg".to_string(),
        badge: None,
    }
}

/// Shipping details that pass validation.
#[must_use]
pub fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        full_name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        pincode: "560001".to_string(),
    }
}

/// A fresh directory path under the system temp dir. Not created.
#[must_use]
pub fn temp_session_dir() -> PathBuf {
    std::env::temp_dir().join(format!("freshco-it-{}", uuid::Uuid::new_v4()))
}
