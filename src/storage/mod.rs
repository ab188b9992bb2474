//! Persistent key/value storage for client-side state.
//!
//! The portal keeps a handful of string values between sessions (token pair,
//! active role, display preferences). Backends implement [`KeyValueStorage`]
//! with the same get/set/remove surface as browser local storage.

#[cfg(feature = "keychain")]
pub mod keychain;
pub mod preferences;
pub mod tokens;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

/// Synchronous string storage keyed by fixed names.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. State is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// File name used by [`FileStorage`] inside its directory.
const STORAGE_FILE_NAME: &str = "storage.json";

/// All keys in a single JSON object file.
///
/// The file is re-read on every access so several processes sharing a state
/// directory see each other's writes. A missing file is an empty store.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage backed by `<dir>/storage.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(items)?;
        // Write to a sibling file first so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.load()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.save(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));

        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().join("nested"));
        assert_eq!(storage.get_item("anything").unwrap(), None);
        storage.remove_item("anything").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::in_dir(dir.path().join("state"));
            storage.set_item("activeRole", "editor").unwrap();
            storage.set_item("lowVision", "1").unwrap();
        }

        let reopened = FileStorage::in_dir(dir.path().join("state"));
        assert_eq!(reopened.get_item("activeRole").unwrap().as_deref(), Some("editor"));
        assert_eq!(reopened.get_item("lowVision").unwrap().as_deref(), Some("1"));

        reopened.remove_item("activeRole").unwrap();
        assert_eq!(reopened.get_item("activeRole").unwrap(), None);
        assert_eq!(reopened.get_item("lowVision").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "{not json").unwrap();

        let result = storage.get_item("sj_tokens");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
