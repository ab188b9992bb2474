//! Shared state for journal-cli commands.
//!
//! Holds the API client and the preference store. Tokens live either in the
//! state directory next to the preferences or, with `--keychain`, in the OS
//! credential store.

use std::sync::Arc;

use journal_client::storage::preferences::Preferences;
use journal_client::storage::{FileStorage, KeyValueStorage};
use journal_client::{ApiClient, ClientConfig};

/// Where the token pair is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBackend {
    File,
    Keychain,
}

pub struct AppState {
    /// Client for the journal API gateway.
    pub api: ApiClient,

    /// Active role, low-vision mode and language.
    pub preferences: Preferences,

    /// Origin used to rewrite storage download links.
    pub origin: Option<String>,
}

impl AppState {
    pub fn new(config: &ClientConfig, backend: TokenBackend) -> Result<Self, String> {
        let state_dir = config.resolved_state_dir();
        log::debug!("Using state directory {}", state_dir.display());

        let file_storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::in_dir(&state_dir));
        let token_storage = match backend {
            TokenBackend::File => file_storage.clone(),
            TokenBackend::Keychain => keychain_storage()?,
        };

        Ok(Self {
            api: ApiClient::new(config, token_storage),
            preferences: Preferences::new(file_storage),
            origin: config.runtime_origin.clone(),
        })
    }
}

#[cfg(feature = "keychain")]
fn keychain_storage() -> Result<Arc<dyn KeyValueStorage>, String> {
    use journal_client::storage::keychain::KeychainStorage;
    Ok(Arc::new(KeychainStorage::new()))
}

#[cfg(not(feature = "keychain"))]
fn keychain_storage() -> Result<Arc<dyn KeyValueStorage>, String> {
    Err("journal-cli was built without keychain support".to_string())
}
