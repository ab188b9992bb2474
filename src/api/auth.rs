//! Authentication and user endpoints.
//!
//! `login` only returns the issued tokens; callers decide whether to keep
//! them with [`ApiClient::set_tokens`].

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::types::{LoginRequest, MeResponse, RegisterRequest, ReviewerQuery, TokenResponse, UserRoles};
use crate::storage::preferences::Language;

/// POST /auth/login
pub async fn login(
    client: &ApiClient,
    credentials: &LoginRequest,
) -> Result<Option<TokenResponse>, ApiError> {
    client
        .request(ApiRequest::post("/auth/login").json(credentials)?)
        .await
}

/// POST /auth/register
///
/// New accounts may need editor approval before `login` succeeds.
pub async fn register<T: DeserializeOwned>(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<Option<T>, ApiError> {
    client
        .request(ApiRequest::post("/auth/register").json(request)?)
        .await
}

/// GET /auth/me
pub async fn me(client: &ApiClient) -> Result<MeResponse, ApiError> {
    client.fetch(ApiRequest::get("/auth/me")).await
}

/// GET /users/me/roles
pub async fn my_roles(client: &ApiClient) -> Result<UserRoles, ApiError> {
    client.fetch(ApiRequest::get("/users/me/roles")).await
}

/// GET /users/reviewers?language={language}
pub async fn reviewers<T: DeserializeOwned>(
    client: &ApiClient,
    language: Option<Language>,
) -> Result<T, ApiError> {
    client
        .fetch(ApiRequest::get("/users/reviewers").query(&ReviewerQuery { language })?)
        .await
}
