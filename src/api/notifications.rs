//! In-app notifications.

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{segment, ApiRequest};
use super::types::{Notification, NotificationQuery, NotificationStatus};

/// GET /notifications
pub async fn list(
    client: &ApiClient,
    filters: &NotificationQuery,
) -> Result<Vec<Notification>, ApiError> {
    client
        .fetch(ApiRequest::get("/notifications").query(filters)?)
        .await
}

/// Page size used when counting unread notifications for the header badge.
pub const UNREAD_BADGE_LIMIT: u32 = 50;

/// Number of unread notifications on the first badge page.
pub async fn unread_count(client: &ApiClient) -> Result<usize, ApiError> {
    let unread = list(
        client,
        &NotificationQuery {
            status: Some(NotificationStatus::Unread),
            limit: Some(UNREAD_BADGE_LIMIT),
            offset: Some(0),
        },
    )
    .await?;
    Ok(unread.len())
}

/// POST /notifications/{id}/read
pub async fn mark_read(client: &ApiClient, notification_id: i64) -> Result<(), ApiError> {
    let path = format!("/notifications/{}/read", segment(notification_id));
    client.execute(ApiRequest::post(path)).await
}

/// DELETE /notifications/{id}
pub async fn delete(client: &ApiClient, notification_id: i64) -> Result<(), ApiError> {
    let path = format!("/notifications/{}", segment(notification_id));
    client.execute(ApiRequest::delete(path)).await
}
