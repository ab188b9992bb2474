//! Journal volumes: editor management and the public archive.

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{segment, ApiRequest};
use super::types::{NewVolume, PublicVolumeQuery, VolumeQuery, VolumeUpdate};

/// GET /volumes
pub async fn list<T: DeserializeOwned>(
    client: &ApiClient,
    filters: &VolumeQuery,
) -> Result<T, ApiError> {
    client.fetch(ApiRequest::get("/volumes").query(filters)?).await
}

/// GET /volumes/{id}
pub async fn get<T: DeserializeOwned>(
    client: &ApiClient,
    volume_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/volumes/{}", segment(volume_id));
    client.fetch(ApiRequest::get(path)).await
}

/// GET /volumes/public (no login required)
pub async fn list_public<T: DeserializeOwned>(
    client: &ApiClient,
    filters: &PublicVolumeQuery,
) -> Result<T, ApiError> {
    client
        .fetch(ApiRequest::get("/volumes/public").query(filters)?)
        .await
}

/// GET /volumes/public/{id}
pub async fn get_public<T: DeserializeOwned>(
    client: &ApiClient,
    volume_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/volumes/public/{}", segment(volume_id));
    client.fetch(ApiRequest::get(path)).await
}

/// POST /volumes
pub async fn create<T: DeserializeOwned>(
    client: &ApiClient,
    volume: &NewVolume,
) -> Result<Option<T>, ApiError> {
    client.request(ApiRequest::post("/volumes").json(volume)?).await
}

/// PATCH /volumes/{id}
pub async fn update<T: DeserializeOwned>(
    client: &ApiClient,
    volume_id: impl std::fmt::Display,
    changes: &VolumeUpdate,
) -> Result<Option<T>, ApiError> {
    let path = format!("/volumes/{}", segment(volume_id));
    client.request(ApiRequest::patch(path).json(changes)?).await
}
