//! Durable storage of the bearer token pair.
//!
//! The pair is persisted as one camelCase JSON record under [`TOKEN_KEY`].
//! Reads never fail: corrupt or unreadable data is logged and treated as
//! "no session".

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::{KeyValueStorage, StorageError};

/// Storage key holding the serialized [`AuthTokens`].
pub const TOKEN_KEY: &str = "sj_tokens";

/// Access/refresh token pair issued by `/auth/login` and `/auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Reads and writes [`AuthTokens`] through a [`KeyValueStorage`] backend.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted pair, or `None` when absent or unreadable.
    pub fn read(&self) -> Option<AuthTokens> {
        let raw = match self.storage.get_item(TOKEN_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read tokens: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<AuthTokens>(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                log::error!("Failed to read tokens: stored record is corrupt: {}", e);
                None
            }
        }
    }

    /// Persist `tokens`, or remove the record when `None`.
    pub fn write(&self, tokens: Option<&AuthTokens>) -> Result<(), StorageError> {
        match tokens {
            Some(tokens) => {
                let mut raw = serde_json::to_string(tokens)?;
                let result = self.storage.set_item(TOKEN_KEY, &raw);
                raw.zeroize();
                result
            }
            None => self.storage.remove_item(TOKEN_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, TokenStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = TokenStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_write_then_read_in_fresh_store() {
        let (storage, store) = store();
        let tokens = AuthTokens::new("a").with_refresh_token("b");
        store.write(Some(&tokens)).unwrap();

        // A new store over the same backend simulates a process restart.
        let restarted = TokenStore::new(storage);
        assert_eq!(restarted.read(), Some(tokens));
    }

    #[test]
    fn test_write_none_clears() {
        let (_storage, store) = store();
        store.write(Some(&AuthTokens::new("a"))).unwrap();
        store.write(None).unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_corrupt_record_reads_as_none() {
        let (storage, store) = store();
        storage.set_item(TOKEN_KEY, "{\"accessToken\":").unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let (storage, store) = store();
        let tokens = AuthTokens::new("acc")
            .with_refresh_token("ref")
            .with_token_type("bearer");
        store.write(Some(&tokens)).unwrap();

        let raw = storage.get_item(TOKEN_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["accessToken"], "acc");
        assert_eq!(value["refreshToken"], "ref");
        assert_eq!(value["tokenType"], "bearer");
    }

    #[test]
    fn test_reads_record_without_optional_fields() {
        let (storage, store) = store();
        storage.set_item(TOKEN_KEY, r#"{"accessToken":"only"}"#).unwrap();
        assert_eq!(store.read(), Some(AuthTokens::new("only")));
    }

    #[test]
    fn test_debug_output_redacts_tokens() {
        let tokens = AuthTokens::new("secret-access").with_refresh_token("secret-refresh");
        let printed = format!("{:?}", tokens);
        assert!(!printed.contains("secret"));
    }
}
