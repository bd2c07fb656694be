//! User repository: verified identities and pending registrations.

use std::collections::HashMap;
use std::sync::RwLock;

use freshco_core::{Email, Mobile};

use super::RepositoryError;
use crate::models::user::{IdentityRecord, PendingRegistration};

/// Repository for identities and registrations awaiting verification.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Get an identity (with its credential) by email.
    async fn find_identity(&self, email: &Email)
    -> Result<Option<IdentityRecord>, RepositoryError>;

    /// Insert a new identity.
    ///
    /// Fails with `RepositoryError::Conflict` if the email or mobile number
    /// belongs to another identity.
    async fn insert_identity(&self, record: IdentityRecord) -> Result<(), RepositoryError>;

    /// Replace the stored credential of an identity.
    ///
    /// Fails with `RepositoryError::NotFound` if no identity has this email.
    async fn update_password(
        &self,
        email: &Email,
        password_hash: String,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), RepositoryError>;

    /// Get the pending registration for an email.
    async fn find_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, RepositoryError>;

    /// Whether any identity or pending registration uses this mobile number.
    async fn mobile_in_use(&self, mobile: &Mobile) -> Result<bool, RepositoryError>;

    /// Insert a pending registration.
    ///
    /// Fails with `RepositoryError::Conflict` if one already exists for the
    /// email, or the mobile number is in use.
    async fn insert_pending(&self, pending: PendingRegistration) -> Result<(), RepositoryError>;

    /// Delete and return the pending registration for an email.
    async fn take_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, RepositoryError>;
}

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    identities: RwLock<HashMap<Email, IdentityRecord>>,
    pending: RwLock<HashMap<Email, PendingRegistration>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with identities.
    #[must_use]
    pub fn with_identities(records: impl IntoIterator<Item = IdentityRecord>) -> Self {
        let identities = records
            .into_iter()
            .map(|record| (record.identity.email.clone(), record))
            .collect();
        Self {
            identities: RwLock::new(identities),
            pending: RwLock::new(HashMap::new()),
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_identity(
        &self,
        email: &Email,
    ) -> Result<Option<IdentityRecord>, RepositoryError> {
        Ok(self.identities.read()?.get(email).cloned())
    }

    async fn insert_identity(&self, record: IdentityRecord) -> Result<(), RepositoryError> {
        let mut identities = self.identities.write()?;
        if identities.contains_key(&record.identity.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        if record.identity.mobile.is_some()
            && identities
                .values()
                .any(|r| r.identity.mobile == record.identity.mobile)
        {
            return Err(RepositoryError::Conflict("mobile already exists".to_owned()));
        }
        identities.insert(record.identity.email.clone(), record);
        Ok(())
    }

    async fn update_password(
        &self,
        email: &Email,
        password_hash: String,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), RepositoryError> {
        let mut identities = self.identities.write()?;
        let record = identities.get_mut(email).ok_or(RepositoryError::NotFound)?;
        record.password_hash = password_hash;
        record.updated_at = updated_at;
        Ok(())
    }

    async fn find_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, RepositoryError> {
        Ok(self.pending.read()?.get(email).cloned())
    }

    async fn mobile_in_use(&self, mobile: &Mobile) -> Result<bool, RepositoryError> {
        let in_identities = self
            .identities
            .read()?
            .values()
            .any(|r| r.identity.mobile.as_ref() == Some(mobile));
        let in_pending = self
            .pending
            .read()?
            .values()
            .any(|p| p.mobile.as_ref() == Some(mobile));
        Ok(in_identities || in_pending)
    }

    async fn insert_pending(&self, pending: PendingRegistration) -> Result<(), RepositoryError> {
        if pending.mobile.is_some()
            && self
                .identities
                .read()?
                .values()
                .any(|r| r.identity.mobile == pending.mobile)
        {
            return Err(RepositoryError::Conflict("mobile already exists".to_owned()));
        }
        let mut all = self.pending.write()?;
        if all.contains_key(&pending.email) {
            return Err(RepositoryError::Conflict(
                "registration already pending".to_owned(),
            ));
        }
        if pending.mobile.is_some() && all.values().any(|p| p.mobile == pending.mobile) {
            return Err(RepositoryError::Conflict("mobile already pending".to_owned()));
        }
        all.insert(pending.email.clone(), pending);
        Ok(())
    }

    async fn take_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, RepositoryError> {
        Ok(self.pending.write()?.remove(email))
    }
}
