//! System keychain backend for client state.
//!
//! Each storage key becomes its own keychain entry under a fixed service
//! name, so the token pair never lands in a plain file on disk.

use keyring::Entry;

use super::{KeyValueStorage, StorageError};

/// Keychain service name for all portal entries.
const SERVICE_NAME: &str = "kz.journal-portal.client";

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        StorageError::OperationFailed(err.to_string())
    }
}

/// [`KeyValueStorage`] over the platform keychain.
#[derive(Debug, Clone)]
pub struct KeychainStorage {
    service: String,
}

impl KeychainStorage {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom service name (separate profiles, test isolation).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeychainStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for KeychainStorage {
    /// Returns `None` if no entry exists (never stored or already removed).
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    /// Idempotent: a missing entry counts as removed.
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyring_error_maps_to_operation_failed() {
        let err: StorageError = keyring::Error::NoEntry.into();
        assert!(matches!(err, StorageError::OperationFailed(_)));
    }

    #[test]
    fn test_custom_service_name() {
        let storage = KeychainStorage::with_service("journal-test");
        assert_eq!(storage.service, "journal-test");
        assert_eq!(KeychainStorage::default().service, SERVICE_NAME);
    }
}
