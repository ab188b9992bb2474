//! API access layer for the journal portal gateway.
//!
//! Resolves the API base once, injects bearer tokens, refreshes them on 401
//! with a single in-flight refresh, and exposes typed helpers per backend
//! resource.
//!
//! Mutating helpers return `Option<T>`, `None` when the server answers 204.
//! Reads use [`ApiClient::fetch`] and treat a missing body as an error.

pub mod articles;
pub mod auth;
pub mod base_url;
pub mod client;
pub mod error;
pub mod files;
pub mod notifications;
pub mod refresh;
pub mod request;
pub mod reviews;
pub mod types;
pub mod volumes;


pub use base_url::resolve_api_base;
pub use client::ApiClient;
pub use error::ApiError;
pub use request::{ApiRequest, FilePart, RequestBody};
