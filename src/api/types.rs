//! Request and response types for the journal API gateway.
//!
//! Field names follow the backend's snake_case JSON. Optional request fields
//! are omitted when `None` rather than sent as `null`, except where an
//! explicit `null` is meaningful (see [`VolumeUpdate`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::preferences::{Language, Role};
use crate::storage::tokens::AuthTokens;

/// Token type assumed when the server omits one.
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// Identifier the backend sends either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Str(s) => f.write_str(s),
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────

/// Body of `POST /auth/login`. `username` also accepts an e-mail address.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: Option<String>,
    pub institution: Option<String>,
    pub role: Role,
    pub accept_terms: bool,
    pub notify_status: bool,
}

/// Body of `POST /auth/refresh`.
#[derive(Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response of `POST /auth/login` and `POST /auth/refresh`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Token pair for a fresh login.
    pub fn into_tokens(self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: Some(
                self.token_type
                    .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            ),
        }
    }

    /// Token pair after a refresh; keeps `previous_refresh` when the server
    /// did not rotate the refresh token.
    pub fn into_refreshed(self, previous_refresh: String) -> AuthTokens {
        let mut tokens = self.into_tokens();
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(previous_refresh);
        }
        tokens
    }
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub accept_terms: Option<bool>,
    #[serde(default)]
    pub notify_status: Option<bool>,
}

/// Response of `GET /users/me/roles`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRoles {
    pub user_id: Id,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewerQuery {
    pub language: Option<Language>,
}

// ── Articles ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    Original,
    Review,
}

/// Filters for `GET /articles/unassigned`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnassignedQuery {
    pub status: Option<String>,
    pub author_name: Option<String>,
    pub year: Option<i32>,
    pub article_type: Option<ArticleType>,
    pub keywords: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Keyword with titles in all three languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title_ru: String,
    pub title_kz: String,
    pub title_en: String,
}

/// Body of `POST /articles/keywords`, also used inline for new keywords
/// attached to an article submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewKeyword {
    pub title_ru: String,
    pub title_kz: String,
    pub title_en: String,
}

/// Co-author record from `/articles/authors`.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub prefix: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub country: String,
    pub affiliation1: String,
    #[serde(default)]
    pub affiliation2: Option<String>,
    #[serde(default)]
    pub affiliation3: Option<String>,
    #[serde(default)]
    pub is_corresponding: bool,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub scopus_author_id: Option<String>,
    #[serde(default)]
    pub researcher_id: Option<String>,
}

/// Body of `POST /articles/authors`. Blank optional fields are sent as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAuthor {
    pub email: String,
    pub prefix: Option<String>,
    pub first_name: String,
    pub patronymic: Option<String>,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: String,
    pub affiliation1: String,
    pub affiliation2: Option<String>,
    pub affiliation3: Option<String>,
    pub is_corresponding: bool,
    pub orcid: Option<String>,
    pub scopus_author_id: Option<String>,
    pub researcher_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Confirmations {
    pub copyright: bool,
    pub originality: bool,
    pub consent: bool,
}

/// Body of `POST /articles` (new submission, created as a draft).
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub title_kz: Option<String>,
    pub title_en: Option<String>,
    pub title_ru: Option<String>,
    pub abstract_kz: Option<String>,
    pub abstract_en: Option<String>,
    pub abstract_ru: Option<String>,
    pub doi: Option<String>,
    pub status: String,
    pub article_type: ArticleType,
    pub responsible_user_id: Option<i64>,
    pub antiplagiarism_file_id: Option<String>,
    pub manuscript_file_id: Option<String>,
    pub author_info_file_id: Option<String>,
    pub cover_letter_file_id: Option<String>,
    pub not_published_elsewhere: bool,
    pub plagiarism_free: bool,
    pub authors_agree: bool,
    pub generative_ai_info: Option<String>,
    pub authors_text: String,
    pub keyword_ids: Vec<i64>,
    /// Keywords without an id yet; the backend creates and links them.
    pub keywords: Vec<NewKeyword>,
    pub author_ids: Vec<i64>,
    pub comments: Option<String>,
    pub confirmations: Confirmations,
}

impl Default for NewArticle {
    fn default() -> Self {
        Self {
            title_kz: None,
            title_en: None,
            title_ru: None,
            abstract_kz: None,
            abstract_en: None,
            abstract_ru: None,
            doi: None,
            status: "draft".to_string(),
            article_type: ArticleType::Original,
            responsible_user_id: None,
            antiplagiarism_file_id: None,
            manuscript_file_id: None,
            author_info_file_id: None,
            cover_letter_file_id: None,
            not_published_elsewhere: true,
            plagiarism_free: true,
            authors_agree: true,
            generative_ai_info: None,
            authors_text: String::new(),
            keyword_ids: Vec::new(),
            keywords: Vec::new(),
            author_ids: Vec::new(),
            comments: None,
            confirmations: Confirmations::default(),
        }
    }
}

/// Body of `POST /articles/{id}/assign_reviewers`.
#[derive(Debug, Clone, Serialize)]
pub struct AssignReviewers {
    pub reviewer_ids: Vec<i64>,
    /// ISO-8601 deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

/// Body of `PATCH /articles/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_for_author: Option<String>,
}

/// Body of `POST /articles/{id}/antiplagiarism`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AntiplagiarismFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

// ── Reviews ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ResubmissionRequest {
    pub deadline: String,
}

// ── Volumes ──────────────────────────────────────────────────────────────

/// Filters for `GET /volumes`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumeQuery {
    pub year: Option<i32>,
    pub number: Option<i32>,
    pub month: Option<u8>,
    pub active_only: Option<bool>,
}

/// Filters for `GET /volumes/public`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublicVolumeQuery {
    pub year: Option<i32>,
    pub number: Option<i32>,
    pub month: Option<u8>,
}

/// Body of `POST /volumes`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewVolume {
    pub year: i32,
    pub number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_kz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ru: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_ids: Option<Vec<i64>>,
}

/// Body of `PATCH /volumes/{id}`.
///
/// Outer `None` leaves a field untouched; `Some(None)` sends an explicit
/// `null` to clear it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_kz: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ru: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_ids: Option<Vec<i64>>,
}

// ── Notifications ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    System,
    ArticleStatus,
    ReviewAssignment,
    Editorial,
    Custom,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
}

/// Item of `GET /notifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub related_entity: Option<String>,
    pub status: NotificationStatus,
    pub created_at: String,
    #[serde(default)]
    pub read_at: Option<String>,
}

/// Filters for `GET /notifications`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationQuery {
    pub status: Option<NotificationStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ── Files and layout ─────────────────────────────────────────────────────

/// Response of `POST /files`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub url: String,
    pub created_at: String,
}

/// Body of `POST /layout/records`.
#[derive(Debug, Clone, Serialize)]
pub struct NewLayoutRecord {
    pub article_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<i64>,
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let response: TokenResponse =
            serde_json::from_value(json!({"access_token": "new-access"})).unwrap();
        let tokens = response.into_refreshed("old-refresh".to_string());
        assert_eq!(tokens.access_token, "new-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(tokens.token_type.as_deref(), Some(DEFAULT_TOKEN_TYPE));
    }

    #[test]
    fn test_refresh_takes_rotated_refresh_token() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": "a2",
            "refresh_token": "r2",
            "token_type": "Bearer"
        }))
        .unwrap();
        let tokens = response.into_refreshed("r1".to_string());
        assert_eq!(tokens.refresh_token.as_deref(), Some("r2"));
        assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn test_volume_update_distinguishes_absent_and_null() {
        let update = VolumeUpdate {
            month: Some(None),
            title_en: Some(Some("Vol. 3".into())),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"month": null, "title_en": "Vol. 3"})
        );
    }

    #[test]
    fn test_notification_decodes_unknown_kind() {
        let n: Notification = serde_json::from_value(json!({
            "id": 7,
            "user_id": 3,
            "type": "something_new",
            "title": "Hello",
            "status": "unread",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Other);
        assert_eq!(n.status, NotificationStatus::Unread);
        assert!(n.read_at.is_none());
    }

    #[test]
    fn test_user_roles_accepts_numeric_id() {
        let roles: UserRoles =
            serde_json::from_value(json!({"user_id": 12, "roles": ["editor"]})).unwrap();
        assert_eq!(roles.user_id.to_string(), "12");
        assert_eq!(roles.roles, vec!["editor"]);
    }

    #[test]
    fn test_status_change_omits_empty_comment() {
        let body = StatusChange {
            status: "accepted".into(),
            comment_for_author: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"status": "accepted"}));
    }
}
