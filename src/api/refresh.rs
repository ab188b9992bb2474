//! Single-flight access token refresh.
//!
//! The first caller that needs a refresh stores a shared future in the
//! client; every caller arriving before it completes awaits that same future,
//! so any number of simultaneous 401s cost exactly one `POST /auth/refresh`.
//! The future clears the slot itself on completion, success or failure.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};

use super::client::{ApiClient, ClientInner};
use super::error::ApiError;
use super::request::build_url;
use super::types::{RefreshRequest, TokenResponse};
use crate::storage::tokens::AuthTokens;

/// Shared handle to an in-flight refresh.
pub(crate) type PendingRefresh = Shared<BoxFuture<'static, Option<AuthTokens>>>;

/// Relative to the API base.
pub const REFRESH_PATH: &str = "auth/refresh";

impl ApiClient {
    /// Exchange the stored refresh token for a new pair.
    ///
    /// Joins the refresh already in flight if there is one. Returns `None`
    /// without any network call when no refresh token is stored, and `None`
    /// after clearing the session when the refresh fails.
    pub async fn refresh_tokens(&self) -> Option<AuthTokens> {
        let pending = {
            let mut slot = self.inner.pending_refresh.lock().await;
            match *slot {
                Some(ref pending) => pending.clone(),
                None => {
                    let refresh_token = self
                        .inner
                        .tokens
                        .read()
                        .await
                        .as_ref()
                        .and_then(|t| t.refresh_token.clone())?;

                    let pending = run_refresh(Arc::clone(&self.inner), refresh_token)
                        .boxed()
                        .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }
}

async fn run_refresh(inner: Arc<ClientInner>, refresh_token: String) -> Option<AuthTokens> {
    log::info!("Refreshing access token");

    let result = match request_new_tokens(&inner, &refresh_token).await {
        Ok(response) => {
            let tokens = response.into_refreshed(refresh_token);
            inner.replace_tokens(Some(tokens.clone())).await;
            log::info!("Access token refreshed");
            Some(tokens)
        }
        Err(e) => {
            log::error!("Token refresh failed, clearing session: {}", e);
            inner.replace_tokens(None).await;
            None
        }
    };

    inner.pending_refresh.lock().await.take();
    result
}

async fn request_new_tokens(
    inner: &ClientInner,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    let url = build_url(&inner.base_url, REFRESH_PATH, &[])?;
    let body = serde_json::to_vec(&RefreshRequest {
        refresh_token: refresh_token.to_string(),
    })?;

    let response = inner
        .http
        .post(url.clone())
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response_body(status, text, url.to_string()));
    }

    Ok(response.json::<TokenResponse>().await?)
}
