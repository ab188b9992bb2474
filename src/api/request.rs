//! Description of one logical API request.
//!
//! An [`ApiRequest`] is plain data so the executor can rebuild the HTTP request
//! from it more than once (initial send plus one resend after a refresh).

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{multipart, Method, Url};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;

/// Request body. JSON and multipart are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(FilePart),
}

/// One file sent as a multipart form field.
#[derive(Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::InvalidFile(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidFile(format!("{}: no file name", path.display())))?
            .to_string();
        let mime = mime_for_extension(path.extension().and_then(|e| e.to_str()));
        Ok(Self::new(field, file_name, mime, bytes))
    }

    /// Multipart form holding this part. Built fresh for every send.
    pub(crate) fn to_form(&self) -> Result<multipart::Form, ApiError> {
        let part = multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(|e| ApiError::InvalidFile(format!("bad MIME type {}: {}", self.mime, e)))?;
        Ok(multipart::Form::new().part(self.field.clone(), part))
    }
}

/// MIME types for the documents authors and designers upload.
fn mime_for_extension(ext: Option<&str>) -> &'static str {
    match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("odt") => "application/vnd.oasis.opendocument.text",
        Some("rtf") => "application/rtf",
        Some("txt") => "text/plain",
        Some("tex") => "application/x-tex",
        Some("zip") => "application/zip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// A request relative to the API base (or an absolute `http(s)://` URL).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Caller overrides, applied after the default headers.
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters from a struct of optional scalar fields.
    ///
    /// `None` fields are skipped; `null` values are never sent.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        self.query.extend(query_pairs(params)?);
        Ok(self)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Flatten a serializable struct into query pairs.
pub fn query_pairs<Q: Serialize + ?Sized>(params: &Q) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        _ => return Err(ApiError::InvalidQuery("<root>".to_string())),
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => return Err(ApiError::InvalidQuery(key)),
        };
        pairs.push((key, rendered));
    }
    Ok(pairs)
}

/// Percent-encode an identifier for use as one path segment.
pub fn segment(id: impl std::fmt::Display) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}

fn is_absolute_http(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `path` against `base` and apply query pairs.
///
/// Absolute `http(s)://` paths are used as given. A single leading `/` is
/// dropped from relative paths so they stay under the base path.
pub fn build_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
    let mut url = if is_absolute_http(path) {
        Url::parse(path).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?
    } else {
        let relative = path.strip_prefix('/').unwrap_or(path);
        base.join(relative)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?
    };

    if !query.is_empty() {
        // Same-named parameters are replaced, not duplicated.
        let mut existing: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !query.iter().any(|(q, _)| q == k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        existing.extend(query.iter().cloned());
        url.query_pairs_mut().clear().extend_pairs(existing);
    }

    Ok(url)
}

/// Headers for one send, later entries overriding earlier ones.
pub fn build_headers(
    body: &RequestBody,
    access_token: Option<&str>,
    overrides: &HeaderMap,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if matches!(body, RequestBody::Json(_)) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if let Some(token) = access_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidHeader("access token".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://journal.kz/api/").unwrap()
    }

    #[derive(Serialize)]
    struct Params {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        limit: Option<u32>,
        active_only: Option<bool>,
    }

    #[test]
    fn test_relative_path_stays_under_base() {
        let url = build_url(&base(), "/articles/unassigned", &[]).unwrap();
        assert_eq!(url.as_str(), "https://journal.kz/api/articles/unassigned");

        let url = build_url(&base(), "notifications", &[]).unwrap();
        assert_eq!(url.as_str(), "https://journal.kz/api/notifications");
    }

    #[test]
    fn test_absolute_path_is_used_verbatim() {
        let url = build_url(&base(), "HTTPS://files.journal.kz/files/1/download", &[]).unwrap();
        assert_eq!(url.as_str(), "https://files.journal.kz/files/1/download");
    }

    #[test]
    fn test_query_skips_none_and_stringifies_scalars() {
        let pairs = query_pairs(&Params {
            status: None,
            limit: Some(20),
            active_only: Some(true),
        })
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("active_only".to_string(), "true".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );

        let url = build_url(&base(), "/volumes", &pairs).unwrap();
        assert_eq!(
            url.as_str(),
            "https://journal.kz/api/volumes?active_only=true&limit=20"
        );
    }

    #[test]
    fn test_query_replaces_existing_key() {
        let pairs = vec![("page".to_string(), "2".to_string())];
        let url = build_url(&base(), "/articles?page=1&q=x", &pairs).unwrap();
        assert_eq!(url.as_str(), "https://journal.kz/api/articles?q=x&page=2");
    }

    #[test]
    fn test_nested_query_value_is_rejected() {
        let result = query_pairs(&json!({"ids": [1, 2]}));
        assert!(matches!(result, Err(ApiError::InvalidQuery(k)) if k == "ids"));
    }

    #[test]
    fn test_unit_query_is_empty() {
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_header_precedence() {
        let mut overrides = HeaderMap::new();
        overrides.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let headers =
            build_headers(&RequestBody::Json(json!({})), Some("tok"), &overrides).unwrap();
        assert_eq!(headers[ACCEPT], "text/plain");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_no_content_type_without_json_body() {
        let part = FilePart::new("upload", "a.pdf", "application/pdf", vec![1, 2, 3]);
        let headers = build_headers(&RequestBody::Multipart(part), None, &HeaderMap::new()).unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment(42), "42");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_for_extension(Some("PDF")), "application/pdf");
        assert_eq!(mime_for_extension(Some("jpeg")), "image/jpeg");
        assert_eq!(mime_for_extension(None), "application/octet-stream");
    }

    #[test]
    fn test_file_part_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manuscript.docx");
        std::fs::write(&path, b"content").unwrap();

        let part = FilePart::from_path("upload", &path).unwrap();
        assert_eq!(part.file_name, "manuscript.docx");
        assert_eq!(part.field, "upload");
        assert_eq!(part.bytes, b"content");
        assert!(part.mime.contains("wordprocessingml"));

        let missing = FilePart::from_path("upload", dir.path().join("nope.pdf"));
        assert!(matches!(missing, Err(ApiError::InvalidFile(_))));
    }
}
