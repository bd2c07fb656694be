//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, verification codes, login, password reset
//! - `notifier` - Out-of-band code delivery
//! - `catalog` - Product browsing
//! - `checkout` - Orders from the cart

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod notifier;

pub use auth::{AuthError, AuthErrorKind, AuthService, IssuedCode};
pub use catalog::{CatalogError, CatalogService, ProductQuery, SortBy};
pub use checkout::{CheckoutError, CheckoutService};
pub use notifier::{ConsoleNotifier, DeliveryError, Destination, Notifier, RecordingNotifier};
