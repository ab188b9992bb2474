//! HTTP client with bearer token injection and transparent refresh-on-401.
//!
//! Every request is built from the token current at send time. When the
//! server answers 401 the request is resent at most once, after either a
//! refresh performed by this client or one already completed by a concurrent
//! request.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use zeroize::Zeroize;

use super::base_url::resolve_api_base;
use super::error::ApiError;
use super::refresh::PendingRefresh;
use super::request::{build_headers, build_url, ApiRequest, RequestBody};
use crate::config::ClientConfig;
use crate::storage::tokens::{AuthTokens, TokenStore};
use crate::storage::KeyValueStorage;

/// Client for the journal API gateway.
///
/// Cheap to clone; clones share tokens and the pending refresh. Separate
/// instances created with [`ApiClient::new`] share nothing but their storage.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) store: TokenStore,
    /// In-memory source of truth, loaded once from `store` at construction.
    pub(crate) tokens: RwLock<Option<AuthTokens>>,
    /// Refresh currently in flight, shared by every caller that hits a 401.
    pub(crate) pending_refresh: Mutex<Option<PendingRefresh>>,
    pub(crate) log_bodies: bool,
}

impl ClientInner {
    /// Replace the current tokens and write them through to storage.
    pub(crate) async fn replace_tokens(&self, tokens: Option<AuthTokens>) {
        {
            let mut guard = self.tokens.write().await;
            if let Some(ref mut old) = *guard {
                old.zeroize();
            }
            *guard = tokens.clone();
        }
        if let Err(e) = self.store.write(tokens.as_ref()) {
            log::error!("Failed to persist tokens: {}", e);
        }
    }
}

/// Where a logical request is in its send/resend cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retried,
}

impl ApiClient {
    /// Create a client, resolving the API base and loading persisted tokens.
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = resolve_api_base(
            config.api_base.as_deref(),
            config.runtime_origin.as_deref(),
        );
        let store = TokenStore::new(storage);
        let tokens = store.read();

        log::info!(
            "API base resolved to {} (stored session: {})",
            base_url,
            if tokens.is_some() { "yes" } else { "no" }
        );

        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                store,
                tokens: RwLock::new(tokens),
                pending_refresh: Mutex::new(None),
                log_bodies: config.log_bodies,
            }),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Current token pair, if any.
    pub async fn tokens(&self) -> Option<AuthTokens> {
        self.inner.tokens.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.tokens.read().await.is_some()
    }

    /// Store a new token pair (after login), or clear it with `None`.
    pub async fn set_tokens(&self, tokens: Option<AuthTokens>) {
        self.inner.replace_tokens(tokens).await;
    }

    /// Drop the session locally. Does not contact the server.
    pub async fn logout(&self) {
        log::info!("Clearing stored session");
        self.inner.replace_tokens(None).await;
    }

    async fn access_token(&self) -> Option<String> {
        self.inner
            .tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// Perform one logical request.
    ///
    /// Returns `Ok(None)` for 204 responses, the decoded JSON body otherwise.
    /// Non-2xx responses become [`ApiError::Status`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let url = build_url(&self.inner.base_url, &request.path, &request.query)?;
        let started = Instant::now();
        self.log_outgoing(&request, &url);

        let mut attempt = Attempt::Initial;
        let response = loop {
            let sent_token = self.access_token().await;
            let response = self.send_once(&request, &url, sent_token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || attempt == Attempt::Retried {
                break response;
            }
            attempt = Attempt::Retried;

            // A concurrent request may have refreshed while this one was in flight.
            let current = self.access_token().await;
            if current.is_some() && current != sent_token {
                log::debug!("[api] token changed during request, resending {} {}", request.method, url);
                continue;
            }

            match self.refresh_tokens().await {
                Some(_) => {
                    log::debug!("[api] token refreshed, resending {} {}", request.method, url);
                    continue;
                }
                None => break response,
            }
        };

        self.finish(response, &request, url, started).await
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        url: &Url,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let headers = build_headers(&request.body, access_token, &request.headers)?;
        let builder = self
            .inner
            .http
            .request(request.method.clone(), url.clone())
            .headers(headers);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(ref value) => builder.body(serde_json::to_vec(value)?),
            RequestBody::Multipart(ref part) => builder.multipart(part.to_form()?),
        };

        builder.send().await.map_err(|e| {
            log::warn!("[api] {} {} failed: {}", request.method, url, e);
            ApiError::Transport(e)
        })
    }

    async fn finish<T: DeserializeOwned>(
        &self,
        response: Response,
        request: &ApiRequest,
        url: Url,
        started: Instant,
    ) -> Result<Option<T>, ApiError> {
        let status = response.status();
        let elapsed = started.elapsed().as_millis();

        if !status.is_success() {
            let text = response.text().await?;
            log::warn!(
                "[api] <= {} {} {} {}ms",
                status.as_u16(),
                request.method,
                url,
                elapsed
            );
            if self.inner.log_bodies {
                log::debug!("[api] <= error body: {}", text);
            }
            return Err(ApiError::from_response_body(status, text, url.to_string()));
        }

        if status == StatusCode::NO_CONTENT {
            log::debug!(
                "[api] <= {} {} {} {}ms (no content)",
                status.as_u16(),
                request.method,
                url,
                elapsed
            );
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        log::debug!(
            "[api] <= {} {} {} {}ms ({} bytes)",
            status.as_u16(),
            request.method,
            url,
            elapsed,
            bytes.len()
        );
        if self.inner.log_bodies {
            log::debug!("[api] <= body: {}", String::from_utf8_lossy(&bytes));
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn log_outgoing(&self, request: &ApiRequest, url: &Url) {
        log::debug!("[api] => {} {}", request.method, url);
        if !self.inner.log_bodies {
            return;
        }
        match request.body {
            RequestBody::Empty => {}
            RequestBody::Json(ref value) => log::debug!("[api] => body: {}", value),
            RequestBody::Multipart(ref part) => log::debug!(
                "[api] => multipart {}={} ({}, {} bytes)",
                part.field,
                part.file_name,
                part.mime,
                part.bytes.len()
            ),
        }
    }

    /// Like [`ApiClient::request`] but a 204 is an error.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let url = build_url(&self.inner.base_url, &request.path, &request.query)?;
        self.request(request)
            .await?
            .ok_or_else(|| ApiError::NoContent {
                url: url.to_string(),
            })
    }

    /// Perform a request whose response body, if any, is not needed.
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.request::<IgnoredAny>(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.request(ApiRequest::delete(path)).await
    }
}
