//! One-time code repository.

use std::collections::HashMap;
use std::sync::RwLock;

use freshco_core::Email;

use super::RepositoryError;
use crate::models::user::OneTimeCode;

/// Repository for live one-time codes, keyed by email.
#[trait_variant::make(CodeRepository: Send)]
pub trait LocalCodeRepository {
    /// Get the live code for an email, expired or not.
    async fn find(&self, email: &Email) -> Result<Option<OneTimeCode>, RepositoryError>;

    /// Store a code, replacing any previous code for the same email.
    async fn put(&self, code: OneTimeCode) -> Result<(), RepositoryError>;

    /// Delete the code for an email. Deleting a missing code is not an error.
    async fn delete(&self, email: &Email) -> Result<(), RepositoryError>;
}

/// In-memory code repository.
#[derive(Debug, Default)]
pub struct InMemoryCodeRepository {
    codes: RwLock<HashMap<Email, OneTimeCode>>,
}

impl InMemoryCodeRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeRepository for InMemoryCodeRepository {
    async fn find(&self, email: &Email) -> Result<Option<OneTimeCode>, RepositoryError> {
        Ok(self.codes.read()?.get(email).cloned())
    }

    async fn put(&self, code: OneTimeCode) -> Result<(), RepositoryError> {
        self.codes.write()?.insert(code.email.clone(), code);
        Ok(())
    }

    async fn delete(&self, email: &Email) -> Result<(), RepositoryError> {
        self.codes.write()?.remove(email);
        Ok(())
    }
}
