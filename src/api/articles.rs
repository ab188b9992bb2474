//! Article submission and editorial workflow endpoints.

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::{segment, ApiRequest};
use super::types::{
    AntiplagiarismFile, AssignReviewers, Author, Keyword, NewArticle, NewAuthor, NewKeyword,
    StatusChange, UnassignedQuery,
};

/// POST /articles
pub async fn create_article<T: DeserializeOwned>(
    client: &ApiClient,
    article: &NewArticle,
) -> Result<Option<T>, ApiError> {
    client.request(ApiRequest::post("/articles").json(article)?).await
}

/// GET /articles/unassigned
pub async fn unassigned<T: DeserializeOwned>(
    client: &ApiClient,
    filters: &UnassignedQuery,
) -> Result<T, ApiError> {
    client
        .fetch(ApiRequest::get("/articles/unassigned").query(filters)?)
        .await
}

/// GET /articles/editor/{id}
pub async fn editor_detail<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/articles/editor/{}", segment(article_id));
    client.fetch(ApiRequest::get(path)).await
}

/// GET /articles/editor/{id}/versions/{version_id}
pub async fn editor_version<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
    version_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!(
        "/articles/editor/{}/versions/{}",
        segment(article_id),
        segment(version_id)
    );
    client.fetch(ApiRequest::get(path)).await
}

/// POST /articles/{id}/assign_reviewers
pub async fn assign_reviewers<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
    body: &AssignReviewers,
) -> Result<Option<T>, ApiError> {
    let path = format!("/articles/{}/assign_reviewers", segment(article_id));
    client.request(ApiRequest::post(path).json(body)?).await
}

/// GET /articles/{id}/reviewers
pub async fn article_reviewers<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
) -> Result<T, ApiError> {
    let path = format!("/articles/{}/reviewers", segment(article_id));
    client.fetch(ApiRequest::get(path)).await
}

/// PATCH /articles/{id}/status (editor role).
///
/// `comment_for_author` is only sent when non-empty.
pub async fn change_status<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
    status: &str,
    comment_for_author: Option<&str>,
) -> Result<Option<T>, ApiError> {
    let body = StatusChange {
        status: status.to_string(),
        comment_for_author: comment_for_author
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    };
    let path = format!("/articles/{}/status", segment(article_id));
    client.request(ApiRequest::patch(path).json(&body)?).await
}

/// POST /articles/{id}/antiplagiarism (editor role).
pub async fn set_antiplagiarism_file<T: DeserializeOwned>(
    client: &ApiClient,
    article_id: impl std::fmt::Display,
    file: &AntiplagiarismFile,
) -> Result<Option<T>, ApiError> {
    let path = format!("/articles/{}/antiplagiarism", segment(article_id));
    client.request(ApiRequest::post(path).json(file)?).await
}

/// GET /articles/authors
pub async fn list_authors(client: &ApiClient) -> Result<Vec<Author>, ApiError> {
    client.fetch(ApiRequest::get("/articles/authors")).await
}

/// POST /articles/authors
pub async fn create_author(
    client: &ApiClient,
    author: &NewAuthor,
) -> Result<Option<Author>, ApiError> {
    client
        .request(ApiRequest::post("/articles/authors").json(author)?)
        .await
}

/// GET /articles/keywords
pub async fn list_keywords(client: &ApiClient) -> Result<Vec<Keyword>, ApiError> {
    client.fetch(ApiRequest::get("/articles/keywords")).await
}

/// POST /articles/keywords
pub async fn create_keyword(
    client: &ApiClient,
    keyword: &NewKeyword,
) -> Result<Option<Keyword>, ApiError> {
    client
        .request(ApiRequest::post("/articles/keywords").json(keyword)?)
        .await
}

