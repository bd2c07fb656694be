//! The assembled storefront: both stores plus catalog and checkout, wired to
//! in-memory repositories.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use freshco_core::{Email, IdentityId, Mobile, PaymentMethod};

use crate::clock::Clock;
use crate::config::StorefrontConfig;
use crate::db::{
    InMemoryCodeRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryUserRepository, SessionStorageBackend,
};
use crate::error::Result;
use crate::models::{Identity, IdentityRecord, Order, ShippingDetails};
use crate::services::auth::{AuthService, hash_password};
use crate::services::catalog::CatalogService;
use crate::services::checkout::CheckoutService;
use crate::services::notifier::Notifier;
use crate::stores::{CartStore, SessionStore};

/// Email of the account every in-memory storefront starts with.
pub const DEMO_EMAIL: &str = "demo@freshco.com";
/// Password of the demo account.
pub const DEMO_PASSWORD: &str = "demo123";
/// Mobile number of the demo account.
pub const DEMO_MOBILE: &str = "9876543210";

/// Session store over the in-memory repositories.
pub type InMemorySessionStore<N> =
    SessionStore<InMemoryUserRepository, InMemoryCodeRepository, N, SessionStorageBackend>;

/// Storefront shared across front-end handlers.
///
/// Cheaply cloneable via `Arc`. The cart sits behind an async mutex so one
/// writer at a time mutates it.
pub struct Storefront<N> {
    inner: Arc<StorefrontInner<N>>,
}

impl<N> Clone for Storefront<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StorefrontInner<N> {
    config: StorefrontConfig,
    session: InMemorySessionStore<N>,
    cart: Mutex<CartStore>,
    catalog: CatalogService<InMemoryProductRepository>,
    checkout: CheckoutService<InMemoryOrderRepository>,
}

impl<N: Notifier> Storefront<N> {
    /// Build a storefront over in-memory repositories.
    ///
    /// The catalog is seeded with the reference products and the user store
    /// with the demo account. Sessions persist to `config.session_dir` when
    /// set, otherwise to memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo account's password cannot be hashed.
    pub fn in_memory(
        config: StorefrontConfig,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let users = Arc::new(InMemoryUserRepository::with_identities([demo_account()?]));
        let auth = AuthService::new(
            users,
            Arc::new(InMemoryCodeRepository::new()),
            notifier,
            Arc::clone(&clock),
            config.auth.clone(),
        );
        let storage = Arc::new(SessionStorageBackend::from_dir(config.session_dir.clone()));

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                session: SessionStore::new(auth, storage),
                cart: Mutex::new(CartStore::new(config.cart)),
                catalog: CatalogService::new(Arc::new(InMemoryProductRepository::seeded())),
                checkout: CheckoutService::new(Arc::new(InMemoryOrderRepository::new()), clock),
                config,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &InMemorySessionStore<N> {
        &self.inner.session
    }

    /// Lock the cart for reading or writing.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().await
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService<InMemoryProductRepository> {
        &self.inner.catalog
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService<InMemoryOrderRepository> {
        &self.inner.checkout
    }

    /// Check out the cart for whoever is signed in.
    ///
    /// # Errors
    ///
    /// Returns the checkout error if there is no session, the cart is empty,
    /// or the details are invalid.
    pub async fn place_order(
        &self,
        details: ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        let session = self.session().current();
        let mut cart = self.cart().await;
        Ok(self
            .checkout()
            .place_order(session.as_ref(), &mut cart, details, payment_method)
            .await?)
    }
}

fn demo_account() -> Result<IdentityRecord> {
    let now = Utc::now();
    let email = Email::parse(DEMO_EMAIL).map_err(crate::services::auth::AuthError::from)?;
    let mobile = Mobile::parse(DEMO_MOBILE).map_err(crate::services::auth::AuthError::from)?;
    Ok(IdentityRecord {
        identity: Identity {
            id: IdentityId::new("1"),
            name: "Demo User".to_string(),
            email,
            mobile: Some(mobile),
            verified: true,
        },
        password_hash: hash_password(DEMO_PASSWORD)?,
        created_at: now,
        updated_at: now,
    })
}
