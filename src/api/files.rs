//! File storage uploads and layout records.
//!
//! Files go through the gateway at `POST /files` as multipart form data;
//! the storage service expects the file in the `upload` field.

use std::path::Path;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{segment, ApiRequest, FilePart};
use super::types::{FileDescriptor, NewLayoutRecord};

/// Multipart field name the storage service reads.
pub const UPLOAD_FIELD: &str = "upload";

/// Origin assumed by [`to_api_files_url`] when none is given.
const DEFAULT_FILES_ORIGIN: &str = "http://localhost:8081";

/// POST /files
pub async fn upload_file(
    client: &ApiClient,
    part: FilePart,
) -> Result<Option<FileDescriptor>, ApiError> {
    let part = FilePart {
        field: UPLOAD_FIELD.to_string(),
        ..part
    };
    client.request(ApiRequest::post("/files").file(part)).await
}

/// Read `path` from disk and upload it.
pub async fn upload_path(
    client: &ApiClient,
    path: impl AsRef<Path>,
) -> Result<Option<FileDescriptor>, ApiError> {
    let part = FilePart::from_path(UPLOAD_FIELD, path)?;
    upload_file(client, part).await
}

/// POST /layout/records
pub async fn create_layout_record<T: DeserializeOwned>(
    client: &ApiClient,
    record: &NewLayoutRecord,
) -> Result<Option<T>, ApiError> {
    client
        .request(ApiRequest::post("/layout/records").json(record)?)
        .await
}

/// GET /layout/articles/{id}/records
pub async fn layout_records_for_article<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/layout/articles/{}/records", segment(article_id));
    client.fetch(ApiRequest::get(path)).await
}

/// Rewrite a storage download link onto the same-origin gateway path.
///
/// Links the storage service hands out point at `/files/{id}/download` on
/// its own host. Those (absolute or relative) become
/// `{origin}/api/files/{id}/download`, keeping the query string. Links already
/// under `/api/files/` and unrelated URLs are returned resolved but otherwise
/// unchanged. Empty input yields `None`.
pub fn to_api_files_url(raw: Option<&str>, origin: Option<&str>) -> Option<String> {
    let raw = raw.filter(|r| !r.is_empty())?;
    let origin = origin.unwrap_or(DEFAULT_FILES_ORIGIN);

    let origin_url = match Url::parse(origin) {
        Ok(url) => url,
        Err(_) => return Some(rewrite_without_parsing(raw)),
    };
    let url = match origin_url.join(raw) {
        Ok(url) => url,
        Err(_) => return Some(rewrite_without_parsing(raw)),
    };

    let path = url.path();
    if path.starts_with("/api/files/") {
        return Some(url.to_string());
    }

    if let Some(idx) = path.find("/files/") {
        let query = url.query().map(|q| format!("?{}", q)).unwrap_or_default();
        let rewritten = format!("/api{}{}", &path[idx..], query);
        if let Ok(api_url) = origin_url.join(&rewritten) {
            return Some(api_url.to_string());
        }
    }

    Some(url.to_string())
}

fn rewrite_without_parsing(raw: &str) -> String {
    if raw.starts_with("/files/") {
        format!("/api{}", raw)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Option<&str> = Some("https://journal.kz");

    #[test]
    fn test_relative_files_link_is_rewritten() {
        assert_eq!(
            to_api_files_url(Some("/files/abc/download"), ORIGIN).as_deref(),
            Some("https://journal.kz/api/files/abc/download")
        );
    }

    #[test]
    fn test_absolute_storage_link_moves_to_origin() {
        assert_eq!(
            to_api_files_url(Some("http://storage:9000/files/abc/download?inline=1"), ORIGIN).as_deref(),
            Some("https://journal.kz/api/files/abc/download?inline=1")
        );
    }

    #[test]
    fn test_gateway_link_is_kept() {
        assert_eq!(
            to_api_files_url(Some("https://cdn.journal.kz/api/files/x/download"), ORIGIN).as_deref(),
            Some("https://cdn.journal.kz/api/files/x/download")
        );
    }

    #[test]
    fn test_unrelated_link_is_resolved_only() {
        assert_eq!(
            to_api_files_url(Some("/docs/guide.pdf"), ORIGIN).as_deref(),
            Some("https://journal.kz/docs/guide.pdf")
        );
    }

    #[test]
    fn test_default_origin_and_empty_input() {
        assert_eq!(
            to_api_files_url(Some("/files/1/download"), None).as_deref(),
            Some("http://localhost:8081/api/files/1/download")
        );
        assert_eq!(to_api_files_url(Some(""), ORIGIN), None);
        assert_eq!(to_api_files_url(None, ORIGIN), None);
    }

    #[test]
    fn test_string_fallback_when_origin_is_malformed() {
        assert_eq!(
            to_api_files_url(Some("/files/1/download"), Some("not an origin")).as_deref(),
            Some("/api/files/1/download")
        );
        assert_eq!(
            to_api_files_url(Some("other/path"), Some("not an origin")).as_deref(),
            Some("other/path")
        );
    }
}
