//! Reviewer and review-management endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{segment, ApiRequest};
use super::types::ResubmissionRequest;

/// GET /reviews/{id}
pub async fn get<T: DeserializeOwned>(
    client: &ApiClient,
    review_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/reviews/{}", segment(review_id));
    client.fetch(ApiRequest::get(path)).await
}

/// GET /reviews/my-reviews
pub async fn my_reviews<T: DeserializeOwned>(client: &ApiClient) -> Result<T, ApiError> {
    client.fetch(ApiRequest::get("/reviews/my-reviews")).await
}

/// GET /reviews/{id}/detail
pub async fn detail<T: DeserializeOwned>(
    client: &ApiClient,
    review_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/reviews/{}/detail", segment(review_id));
    client.fetch(ApiRequest::get(path)).await
}

/// PATCH /reviews/{id}
pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
    client: &ApiClient,
    review_id: impl std::fmt::Display,
    body: &B,
) -> Result<Option<T>, ApiError> {
    let path = format!("/reviews/{}", segment(review_id));
    client.request(ApiRequest::patch(path).json(body)?).await
}

/// PATCH /reviews/{id}/request-resubmission (editor role).
///
/// The backend accepts an empty body, or `{"deadline": ...}` to move the deadline.
pub async fn request_resubmission<T: DeserializeOwned>(
    client: &ApiClient,
    review_id: impl std::fmt::Display,
    deadline: Option<&str>,
) -> Result<Option<T>, ApiError> {
    let path = format!("/reviews/{}/request-resubmission", segment(review_id));
    let request = match deadline {
        Some(deadline) => ApiRequest::patch(path).json(&ResubmissionRequest {
            deadline: deadline.to_string(),
        })?,
        None => ApiRequest::patch(path),
    };
    client.request(request).await
}
