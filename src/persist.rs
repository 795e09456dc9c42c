//! Persistence: the key-value blob store the session saves into, plus
//! whole-state export and import.
//!
//! Storage failures are surfaced as errors but the session treats them as
//! non-fatal - the in-memory state stays authoritative for the rest of
//! the session.

use crate::world::WorldState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Errors from persistence and import operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(serde_json::Error),

    #[error("blob could not be deserialized: {0}")]
    Deserialization(serde_json::Error),
}

/// Key-value blob storage behind the session.
///
/// Hosts provide whatever backing they have - browser-style local
/// storage, files, a database. Keys are plain strings; blobs are opaque
/// JSON text.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `blob` under `key`, replacing any previous value.
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError>;

    /// Fetch the blob stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for &T {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        (**self).save(key, blob).await
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).load(key).await
    }
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        (**self).save(key, blob).await
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).load(key).await
    }
}

// ============================================================================
// File Store
// ============================================================================

/// One JSON file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Keys are sanitized to alphanumerics so arbitrary session names
    /// stay valid file names.
    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = key
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>();
        self.base_dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.path_for(key), blob).await?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory store for tests and for hosts that flush state elsewhere
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }
}

// ============================================================================
// Export / Import
// ============================================================================

impl WorldState {
    /// Serialize the full state as pretty JSON - the export file format
    /// and the blob the session persists.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self).map_err(PersistError::Serialization)
    }

    /// Parse a previously exported state. This only constructs a new
    /// value, so a failed parse leaves whatever the caller currently
    /// holds untouched.
    pub fn from_json(blob: &str) -> Result<Self, PersistError> {
        serde_json::from_str(blob).map_err(PersistError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_import_round_trip() {
        let mut state = WorldState::new();
        state.add_item("Lantern", 2, "Casts a warm light");
        state.set_location("Harbor", Some("Coastlands"));
        state.update_journal("Mira", Some("Friend"), Some("Sells herbs"), None);
        state.update_relationship("Mira", None, 42);
        state.advance_time(95);

        let blob = state.to_json().unwrap();
        let restored = WorldState::from_json(&blob).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_malformed_blob_fails_cleanly() {
        let err = WorldState::from_json("{ definitely not json").unwrap_err();
        assert!(matches!(err, PersistError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.save("slot", "payload").await.unwrap();
        assert_eq!(store.load("slot").await.unwrap().as_deref(), Some("payload"));
        assert_eq!(store.load("other").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.save("campaign one", "{\"x\":1}").await.unwrap();
        assert_eq!(
            store.load("campaign one").await.unwrap().as_deref(),
            Some("{\"x\":1}")
        );

        // Missing keys are absent, not errors.
        assert_eq!(store.load("never saved").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_sanitizes_keys() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.save("My Save!/v2", "blob").await.unwrap();
        assert!(dir.path().join("My_Save__v2.json").exists());
    }
}
