//! Key-value persistence for the signed-in identity.
//!
//! Values are opaque strings; the session store writes JSON under a single
//! fixed key. Two backends are provided: process memory, and a directory
//! with one file per key.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::RepositoryError;

/// A string key-value store.
#[trait_variant::make(SessionStorage: Send)]
pub trait LocalSessionStorage {
    /// Read a value. Missing keys are `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), RepositoryError>;
}

/// Session storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.values.read()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        self.values.write()?.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.values.write()?.remove(key);
        Ok(())
    }
}

/// Session storage backed by `<dir>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Store files under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the session files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, RepositoryError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(RepositoryError::Backend(format!(
                "invalid session key: {key:?}"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session storage chosen at runtime from configuration.
#[derive(Debug)]
pub enum SessionStorageBackend {
    Memory(MemorySessionStorage),
    File(FileSessionStorage),
}

impl SessionStorageBackend {
    /// File storage when a directory is configured, memory otherwise.
    #[must_use]
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or_else(
            || Self::Memory(MemorySessionStorage::new()),
            |dir| Self::File(FileSessionStorage::new(dir)),
        )
    }
}

impl SessionStorage for SessionStorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match self {
            Self::Memory(storage) => SessionStorage::get(storage, key).await,
            Self::File(storage) => SessionStorage::get(storage, key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(storage) => SessionStorage::set(storage, key, value).await,
            Self::File(storage) => SessionStorage::set(storage, key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(storage) => SessionStorage::remove(storage, key).await,
            Self::File(storage) => SessionStorage::remove(storage, key).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{
        FileSessionStorage, MemorySessionStorage, RepositoryError, SessionStorage,
        SessionStorageBackend,
    };

    fn temp_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("freshco-session-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_roundtrip() {
        let storage = MemorySessionStorage::new();
        assert!(storage.get("freshco_user").await.unwrap().is_none());

        storage.set("freshco_user", "{}".to_string()).await.unwrap();
        assert_eq!(
            storage.get("freshco_user").await.unwrap().as_deref(),
            Some("{}")
        );

        storage.remove("freshco_user").await.unwrap();
        storage.remove("freshco_user").await.unwrap();
        assert!(storage.get("freshco_user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_survives_new_handle() {
        let dir = temp_dir();
        let storage = FileSessionStorage::new(&dir);
        assert!(storage.get("freshco_user").await.unwrap().is_none());

        storage
            .set("freshco_user", r#"{"name":"Jane"}"#.to_string())
            .await
            .unwrap();

        let reopened = FileSessionStorage::new(&dir);
        assert_eq!(
            reopened.get("freshco_user").await.unwrap().as_deref(),
            Some(r#"{"name":"Jane"}"#)
        );

        reopened.remove("freshco_user").await.unwrap();
        reopened.remove("freshco_user").await.unwrap();
        assert!(storage.get("freshco_user").await.unwrap().is_none());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_keys() {
        let storage = FileSessionStorage::new(temp_dir());
        let err = storage.get("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Backend(_)));
    }

    #[tokio::test]
    async fn test_backend_from_dir() {
        assert!(matches!(
            SessionStorageBackend::from_dir(None),
            SessionStorageBackend::Memory(_)
        ));

        let backend = SessionStorageBackend::from_dir(Some(temp_dir()));
        assert!(matches!(backend, SessionStorageBackend::File(_)));
        assert!(backend.get("freshco_user").await.unwrap().is_none());
    }
}
