//! Storage for the storefront.
//!
//! Every store the core touches sits behind a repository trait so the
//! in-memory implementations used in tests and demos can be swapped for a
//! real backend without touching the services:
//!
//! - [`users`] - Verified identities and pending registrations
//! - [`codes`] - Live one-time codes, one per email
//! - [`products`] - Read-only product catalog
//! - [`orders`] - Placed orders
//! - [`session_storage`] - Key-value persistence for the signed-in identity
//!
//! The traits are declared with `trait_variant` so implementations write
//! plain `async fn` while callers get `Send` futures.

pub mod codes;
pub mod orders;
pub mod products;
pub mod session_storage;
pub mod users;

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

pub use codes::{CodeRepository, InMemoryCodeRepository};
pub use orders::{InMemoryOrderRepository, OrderRepository};
pub use products::{InMemoryProductRepository, ProductRepository};
pub use session_storage::{
    FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStorageBackend,
};
pub use users::{InMemoryUserRepository, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Filesystem error from a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl<T> From<PoisonError<RwLockReadGuard<'_, T>>> for RepositoryError {
    fn from(_: PoisonError<RwLockReadGuard<'_, T>>) -> Self {
        Self::Backend("lock poisoned".to_owned())
    }
}

impl<T> From<PoisonError<RwLockWriteGuard<'_, T>>> for RepositoryError {
    fn from(_: PoisonError<RwLockWriteGuard<'_, T>>) -> Self {
        Self::Backend("lock poisoned".to_owned())
    }
}
