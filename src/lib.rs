//! Client library for the academic journal portal API.
//!
//! See [`api::ApiClient`] for the request executor and [`storage`] for the
//! persisted session and preferences.

pub mod api;
pub mod config;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use config::ClientConfig;
pub use storage::tokens::AuthTokens;
