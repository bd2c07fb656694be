//! Session/identity store.
//!
//! Wraps [`AuthService`] with the notion of a current session: who is signed
//! in, persisting that identity across restarts, and notifying subscribers
//! when it changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::db::{CodeRepository, RepositoryError, SessionStorage, UserRepository};
use crate::models::Identity;
use crate::services::auth::{AuthError, AuthService, IssuedCode};
use crate::services::notifier::Notifier;

/// Storage key under which the signed-in identity is persisted.
pub const SESSION_KEY: &str = "freshco_user";

/// Session/identity store.
///
/// Every auth call waits out the configured simulated latency before doing
/// anything. Successful sign-ins (`verify_otp`, `login`), `restore` and
/// `logout` publish the new session to subscribers; nothing else does.
pub struct SessionStore<U, C, N, S> {
    auth: AuthService<U, C, N>,
    storage: Arc<S>,
    tx: watch::Sender<Option<Identity>>,
}

impl<U, C, N, S> SessionStore<U, C, N, S>
where
    U: UserRepository,
    C: CodeRepository,
    N: Notifier,
    S: SessionStorage,
{
    /// Create a signed-out store. Call [`restore`](Self::restore) to pick up
    /// a persisted session.
    #[must_use]
    pub fn new(auth: AuthService<U, C, N>, storage: Arc<S>) -> Self {
        let (tx, _) = watch::channel(None);
        Self { auth, storage, tx }
    }

    /// Get a reference to the underlying auth service.
    #[must_use]
    pub const fn auth(&self) -> &AuthService<U, C, N> {
        &self.auth
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// The signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Receive the session after every sign-in and sign-out.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    /// Load the persisted session, if one was saved.
    ///
    /// A record that cannot be parsed is deleted and the store stays signed
    /// out.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be read.
    pub async fn restore(&self) -> Result<Option<Identity>, RepositoryError> {
        let Some(raw) = self.storage.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => {
                tracing::info!(email = %identity.email, "Session restored");
                self.tx.send_replace(Some(identity.clone()));
                Ok(Some(identity))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                self.storage.remove(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Clear the session. Always succeeds.
    pub async fn logout(&self) {
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        if let Some(previous) = self.tx.send_replace(None) {
            tracing::info!(email = %previous.email, "Logged out");
        }
    }

    // =========================================================================
    // Auth flows
    // =========================================================================

    /// See [`AuthService::register`].
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        mobile: Option<&str>,
        password: &str,
    ) -> Result<IssuedCode, AuthError> {
        self.simulate_latency().await;
        self.auth.register(name, email, mobile, password).await
    }

    /// Verify a registration code and sign the new identity in.
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<Identity, AuthError> {
        self.simulate_latency().await;
        let identity = self.auth.verify_otp(email, code).await?;
        self.sign_in(&identity).await;
        Ok(identity)
    }

    /// See [`AuthService::resend_otp`].
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn resend_otp(&self, email: &str) -> Result<IssuedCode, AuthError> {
        self.simulate_latency().await;
        self.auth.resend_otp(email).await
    }

    /// Check credentials and sign in.
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.simulate_latency().await;
        let identity = self.auth.login(email, password).await?;
        self.sign_in(&identity).await;
        Ok(identity)
    }

    /// See [`AuthService::forgot_password`].
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn forgot_password(&self, email: &str) -> Result<IssuedCode, AuthError> {
        self.simulate_latency().await;
        self.auth.forgot_password(email).await
    }

    /// See [`AuthService::reset_password`]. The session is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.simulate_latency().await;
        self.auth.reset_password(email, code, new_password).await
    }

    /// See [`AuthService::resend_available_in`].
    ///
    /// # Errors
    ///
    /// Propagates the auth service's errors.
    pub async fn resend_available_in(&self, email: &str) -> Result<Option<Duration>, AuthError> {
        self.auth.resend_available_in(email).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn simulate_latency(&self) {
        let latency = self.auth.config().simulated_latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Publish and persist a new session. A failed write only costs the
    /// session surviving a restart.
    async fn sign_in(&self, identity: &Identity) {
        match serde_json::to_string(identity) {
            Ok(json) => {
                if let Err(e) = self.storage.set(SESSION_KEY, json).await {
                    tracing::warn!(error = %e, "Failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session"),
        }
        self.tx.send_replace(Some(identity.clone()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use freshco_core::Email;

    use super::{SESSION_KEY, SessionStore};
    use crate::clock::ManualClock;
    use crate::config::AuthConfig;
    use crate::db::{
        InMemoryCodeRepository, InMemoryUserRepository, MemorySessionStorage, SessionStorage,
    };
    use crate::services::auth::{AuthError, AuthService};
    use crate::services::notifier::RecordingNotifier;

    type TestStore = SessionStore<
        InMemoryUserRepository,
        InMemoryCodeRepository,
        RecordingNotifier,
        MemorySessionStorage,
    >;

    fn store_with(config: AuthConfig) -> (TestStore, Arc<RecordingNotifier>, Arc<MemorySessionStorage>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCodeRepository::new()),
            Arc::clone(&notifier),
            Arc::new(ManualClock::default()),
            config,
        );
        (
            SessionStore::new(auth, Arc::clone(&storage)),
            notifier,
            storage,
        )
    }

    fn store() -> (TestStore, Arc<RecordingNotifier>, Arc<MemorySessionStorage>) {
        store_with(AuthConfig::default())
    }

    fn jane() -> Email {
        Email::parse("jane@x.com").unwrap()
    }

    #[tokio::test]
    async fn test_verify_signs_in_and_persists() {
        let (store, notifier, storage) = store();
        let mut rx = store.subscribe();

        store.register("Jane Doe", "jane@x.com", None, "secret1").await.unwrap();
        assert!(store.current().is_none());
        assert!(!rx.has_changed().unwrap());

        let code = notifier.last_code_for(&jane()).unwrap();
        let identity = store.verify_otp("jane@x.com", &code).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&identity));
        assert_eq!(store.current(), Some(identity));

        let persisted = storage.get(SESSION_KEY).await.unwrap().unwrap();
        assert!(persisted.contains("jane@x.com"));
        assert!(!persisted.contains("argon2"));
    }

    #[tokio::test]
    async fn test_failed_login_publishes_nothing() {
        let (store, _, _) = store();
        let rx = store.subscribe();

        let err = store.login("jane@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
        assert!(!rx.has_changed().unwrap());
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (store, notifier, storage) = store();
        store.register("Jane", "jane@x.com", None, "secret1").await.unwrap();
        let code = notifier.last_code_for(&jane()).unwrap();
        store.verify_otp("jane@x.com", &code).await.unwrap();

        store.logout().await;
        assert!(store.current().is_none());
        assert!(storage.get(SESSION_KEY).await.unwrap().is_none());

        // Logging out twice is fine.
        store.logout().await;

        store.login("jane@x.com", "secret1").await.unwrap();
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn test_reset_password_does_not_sign_in() {
        let (store, notifier, _) = store();
        store.register("Jane", "jane@x.com", None, "secret1").await.unwrap();
        let code = notifier.last_code_for(&jane()).unwrap();
        store.verify_otp("jane@x.com", &code).await.unwrap();
        store.logout().await;

        store.forgot_password("jane@x.com").await.unwrap();
        let code = notifier.last_code_for(&jane()).unwrap();
        store
            .reset_password("jane@x.com", &code, "newsecret")
            .await
            .unwrap();

        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_restore_persisted_session() {
        let (first, notifier, storage) = store();
        first.register("Jane", "jane@x.com", None, "secret1").await.unwrap();
        let code = notifier.last_code_for(&jane()).unwrap();
        let identity = first.verify_otp("jane@x.com", &code).await.unwrap();

        // A second store sharing the same storage, as after a restart.
        let auth = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCodeRepository::new()),
            Arc::new(RecordingNotifier::new()),
            Arc::new(ManualClock::default()),
            AuthConfig::default(),
        );
        let second = SessionStore::new(auth, storage);
        assert!(second.current().is_none());

        assert_eq!(second.restore().await.unwrap(), Some(identity.clone()));
        assert_eq!(second.current(), Some(identity));
    }

    #[tokio::test]
    async fn test_restore_discards_corrupt_record() {
        let (store, _, storage) = store();
        storage
            .set(SESSION_KEY, "{not json".to_string())
            .await
            .unwrap();

        assert!(store.restore().await.unwrap().is_none());
        assert!(store.current().is_none());
        assert!(storage.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let config = AuthConfig {
            simulated_latency: Duration::from_millis(800),
            ..AuthConfig::default()
        };
        let (store, _, _) = store_with(config);

        let started = tokio::time::Instant::now();
        let _ = store.login("jane@x.com", "secret1").await;
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
