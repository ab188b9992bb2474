//! Client configuration loaded from the environment.
//!
//! Precedence for the configured API base:
//! `JOURNAL_API_BASE` > `VITE_API_BASE` > value baked in at build time > none
//! (the resolver then defaults to `/api/`).

use std::path::PathBuf;
use std::time::Duration;

/// Build-time API base, if the crate was compiled with `JOURNAL_API_BASE` set.
const BUILD_API_BASE: Option<&str> = option_env!("JOURNAL_API_BASE");

/// Directory name under the platform config dir for persisted client state.
const STATE_DIR_NAME: &str = "journal-portal";

/// Settings consumed by [`crate::api::client::ApiClient::new`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Configured API base (absolute URL or path). `None` means `/api/`.
    pub api_base: Option<String>,
    /// Origin the client is served from. `None` outside a browser-like context.
    pub runtime_origin: Option<String>,
    /// Log request and response bodies. Off by default: auth payloads carry credentials.
    pub log_bodies: bool,
    /// Directory for file-backed storage.
    pub state_dir: Option<PathBuf>,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            runtime_origin: None,
            log_bodies: false,
            state_dir: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Read configuration from process environment variables.
    ///
    /// Call `dotenvy` before this if `.env` files should be honored.
    pub fn from_env() -> Self {
        let api_base = non_empty_var("JOURNAL_API_BASE")
            .or_else(|| non_empty_var("VITE_API_BASE"))
            .or_else(|| BUILD_API_BASE.filter(|v| !v.is_empty()).map(str::to_string));

        Self {
            api_base,
            runtime_origin: non_empty_var("JOURNAL_ORIGIN"),
            log_bodies: non_empty_var("JOURNAL_API_DEBUG")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            state_dir: non_empty_var("JOURNAL_STATE_DIR").map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_runtime_origin(mut self, origin: impl Into<String>) -> Self {
        self.runtime_origin = Some(origin.into());
        self
    }

    pub fn with_log_bodies(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Directory used by file-backed storage.
    ///
    /// Falls back to the working directory when the platform has no config dir.
    pub fn resolved_state_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.state_dir {
            return dir.clone();
        }
        dirs::config_dir()
            .map(|d| d.join(STATE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", STATE_DIR_NAME)))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_base_and_quiet_bodies() {
        let config = ClientConfig::default();
        assert!(config.api_base.is_none());
        assert!(config.runtime_origin.is_none());
        assert!(!config.log_bodies);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" yes "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let config = ClientConfig::default().with_state_dir("/tmp/journal-state");
        assert_eq!(config.resolved_state_dir(), PathBuf::from("/tmp/journal-state"));
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::default()
            .with_api_base("/gateway/")
            .with_runtime_origin("https://journal.example.org")
            .with_log_bodies(true);
        assert_eq!(config.api_base.as_deref(), Some("/gateway/"));
        assert_eq!(
            config.runtime_origin.as_deref(),
            Some("https://journal.example.org")
        );
        assert!(config.log_bodies);
    }
}
