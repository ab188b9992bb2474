//! API error types

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by [`crate::api::client::ApiClient`] and the endpoint helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (DNS, connect, TLS, body read).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error {status}")]
    Status {
        status: StatusCode,
        /// Raw response body.
        body_text: String,
        /// Response body parsed as JSON, if it was JSON.
        body_json: Option<Value>,
        /// Fully resolved request URL.
        url: String,
    },

    /// The server answered 204 where the caller expected a body.
    #[error("No content returned from {url}")]
    NoContent { url: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// A query parameter was not a scalar value.
    #[error("Invalid query parameter {0}: only strings, numbers and booleans are allowed")]
    InvalidQuery(String),

    #[error("Invalid file upload: {0}")]
    InvalidFile(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error, keeping the parsed body when it is valid JSON.
    pub fn from_response_body(status: StatusCode, body_text: String, url: String) -> Self {
        let body_json = if body_text.is_empty() {
            None
        } else {
            serde_json::from_str(&body_text).ok()
        };
        ApiError::Status {
            status,
            body_text,
            body_json,
            url,
        }
    }

    /// HTTP status for [`ApiError::Status`], `None` for other variants.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body_json(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body_json, .. } => body_json.as_ref(),
            _ => None,
        }
    }

    /// The `detail` field of a JSON error body, stringified if it is not a string.
    pub fn detail(&self) -> Option<String> {
        let detail = self.body_json()?.get("detail")?;
        match detail {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 403 whose detail says the account still awaits approval.
    pub fn is_pending_approval(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
            && self
                .detail()
                .map(|d| d.to_ascii_lowercase().contains("pending approval"))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_parsed() {
        let err = ApiError::from_response_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"bad field"}"#.to_string(),
            "http://localhost/api/articles".to_string(),
        );
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.body_json(), Some(&json!({"detail": "bad field"})));
        assert_eq!(err.detail().as_deref(), Some("bad field"));
        assert_eq!(err.to_string(), "API error 422 Unprocessable Entity");
    }

    #[test]
    fn test_non_json_body_keeps_text_only() {
        let err = ApiError::from_response_body(
            StatusCode::BAD_GATEWAY,
            "<html>upstream down</html>".to_string(),
            "http://localhost/api/x".to_string(),
        );
        assert!(err.body_json().is_none());
        match err {
            ApiError::Status { body_text, url, .. } => {
                assert_eq!(body_text, "<html>upstream down</html>");
                assert_eq!(url, "http://localhost/api/x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_has_no_json() {
        let err = ApiError::from_response_body(StatusCode::NOT_FOUND, String::new(), "u".into());
        assert!(err.body_json().is_none());
        assert!(err.detail().is_none());
    }

    #[test]
    fn test_pending_approval_detection() {
        let pending = ApiError::from_response_body(
            StatusCode::FORBIDDEN,
            r#"{"detail":"Account is Pending Approval by editor"}"#.to_string(),
            "u".into(),
        );
        assert!(pending.is_pending_approval());

        let denied = ApiError::from_response_body(
            StatusCode::FORBIDDEN,
            r#"{"detail":"Not enough permissions"}"#.to_string(),
            "u".into(),
        );
        assert!(!denied.is_pending_approval());

        let unauthorized =
            ApiError::from_response_body(StatusCode::UNAUTHORIZED, String::new(), "u".into());
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_pending_approval());
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let err = ApiError::from_response_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#.to_string(),
            "u".into(),
        );
        assert!(err.detail().unwrap().contains("field required"));
    }
}
