//! Persisted UI preferences: active dashboard role, low-vision mode, language.
//!
//! None of these affect the API protocol. Unknown stored values fall back to
//! defaults instead of erroring.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{KeyValueStorage, StorageError};

pub const ACTIVE_ROLE_KEY: &str = "activeRole";
pub const LOW_VISION_KEY: &str = "lowVision";
pub const LANGUAGE_KEY: &str = "sj_lang";

/// Dashboard role a user can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Author,
    Editor,
    Reviewer,
    Designer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Author, Role::Editor, Role::Reviewer, Role::Designer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Editor => "editor",
            Role::Reviewer => "reviewer",
            Role::Designer => "designer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
    Kz,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Kz => "kz",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "kz" => Ok(Language::Kz),
            other => Err(format!("Unknown language: {}", other)),
        }
    }
}

/// Typed access to the preference keys of a [`KeyValueStorage`].
#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn KeyValueStorage>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Stored role, or `None` when missing or unrecognized.
    pub fn stored_role(&self) -> Option<Role> {
        self.read(ACTIVE_ROLE_KEY).and_then(|v| v.parse().ok())
    }

    pub fn active_role(&self) -> Role {
        self.stored_role().unwrap_or_default()
    }

    pub fn set_active_role(&self, role: Role) -> Result<(), StorageError> {
        self.storage.set_item(ACTIVE_ROLE_KEY, role.as_str())
    }

    pub fn low_vision(&self) -> bool {
        self.read(LOW_VISION_KEY).as_deref() == Some("1")
    }

    pub fn set_low_vision(&self, enabled: bool) -> Result<(), StorageError> {
        self.storage
            .set_item(LOW_VISION_KEY, if enabled { "1" } else { "0" })
    }

    pub fn language(&self) -> Language {
        self.read(LANGUAGE_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) -> Result<(), StorageError> {
        self.storage.set_item(LANGUAGE_KEY, language.as_str())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read preference {}: {}", key, e);
                None
            }
        }
    }
}

/// Pick the role to show given the roles the server grants.
///
/// Keeps `stored` if it is granted, else the first granted role, else author.
pub fn pick_active_role(stored: Option<Role>, available: &[Role]) -> Role {
    match stored {
        Some(role) if available.contains(&role) => role,
        _ => available.first().copied().unwrap_or_default(),
    }
}

/// Parse the server's role names, dropping ones this client does not know.
///
/// An empty result becomes `[Author]`.
pub fn parse_roles<S: AsRef<str>>(names: &[S]) -> Vec<Role> {
    let roles: Vec<Role> = names
        .iter()
        .filter_map(|n| n.as_ref().parse().ok())
        .collect();
    if roles.is_empty() {
        vec![Role::Author]
    } else {
        roles
    }
}
