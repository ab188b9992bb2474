//! Resolution of the API base URL.
//!
//! The configured base may be an absolute URL or a bare path. When the client
//! knows the origin it is served from, only the path of the configured value
//! is kept and the host always comes from the runtime origin, so a build made
//! against `localhost` still talks to the machine it was loaded from.

use reqwest::Url;

/// Path used when no base is configured.
pub const DEFAULT_API_PATH: &str = "/api/";

/// Last-resort base when nothing else parses.
pub const FALLBACK_API_BASE: &str = "http://localhost/api/";

/// Compute the absolute API base. Never fails; the result ends with `/`.
pub fn resolve_api_base(configured: Option<&str>, runtime_origin: Option<&str>) -> Url {
    let configured = configured.filter(|v| !v.trim().is_empty());
    let raw = ensure_trailing_slash(configured.unwrap_or(DEFAULT_API_PATH));
    let parsed = Url::parse(&raw).ok();

    let path_only = match parsed {
        Some(ref url) if !url.path().is_empty() => url.path().to_string(),
        Some(_) => "/".to_string(),
        None => raw.clone(),
    };
    let normalized_path = ensure_trailing_slash(&ensure_leading_slash(&path_only));

    let origin = runtime_origin.and_then(|o| Url::parse(o).ok());

    if let Some(ref origin) = origin {
        if let Some(url) = origin
            .join(&normalized_path)
            .ok()
            .and_then(|u| with_trailing_slash(&u))
        {
            return url;
        }
    }

    if let Some(url) = parsed.as_ref().and_then(with_trailing_slash) {
        return url;
    }

    fallback_base(origin.as_ref())
}

fn fallback_base(origin: Option<&Url>) -> Url {
    if let Some(url) = origin.and_then(|o| o.join(DEFAULT_API_PATH).ok()) {
        return url;
    }
    Url::parse(FALLBACK_API_BASE).expect("fallback API base is a valid absolute URL")
}

fn with_trailing_slash(url: &Url) -> Option<Url> {
    let serialized = url.as_str();
    if serialized.ends_with('/') {
        return Some(url.clone());
    }
    Url::parse(&ensure_trailing_slash(serialized)).ok()
}

pub(crate) fn ensure_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

pub(crate) fn ensure_leading_slash(value: &str) -> String {
    if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(configured: Option<&str>, origin: Option<&str>) -> String {
        resolve_api_base(configured, origin).to_string()
    }

    #[test]
    fn test_runtime_origin_wins_over_configured_host() {
        assert_eq!(
            resolve(Some("http://localhost/api/"), Some("https://example.org")),
            "https://example.org/api/"
        );
    }

    #[test]
    fn test_runtime_origin_with_port_keeps_configured_path() {
        assert_eq!(
            resolve(Some("http://localhost:8000/gateway/v1"), Some("http://10.0.0.5:3000")),
            "http://10.0.0.5:3000/gateway/v1/"
        );
    }

    #[test]
    fn test_relative_configured_path_gets_slashes() {
        assert_eq!(
            resolve(Some("gateway"), Some("https://journal.kz")),
            "https://journal.kz/gateway/"
        );
        assert_eq!(
            resolve(Some("/gateway"), Some("https://journal.kz")),
            "https://journal.kz/gateway/"
        );
    }

    #[test]
    fn test_default_path_with_origin() {
        assert_eq!(resolve(None, Some("https://journal.kz")), "https://journal.kz/api/");
        assert_eq!(resolve(Some(""), Some("https://journal.kz")), "https://journal.kz/api/");
    }

    #[test]
    fn test_absolute_configured_without_origin() {
        assert_eq!(
            resolve(Some("https://api.journal.kz/v2"), None),
            "https://api.journal.kz/v2/"
        );
    }

    #[test]
    fn test_unparsable_configured_without_origin_falls_back() {
        assert_eq!(resolve(Some("not a url"), None), FALLBACK_API_BASE);
        assert_eq!(resolve(Some("/api/"), None), FALLBACK_API_BASE);
        assert_eq!(resolve(None, None), FALLBACK_API_BASE);
    }

    #[test]
    fn test_malformed_origin_is_ignored() {
        assert_eq!(
            resolve(Some("https://api.journal.kz/api"), Some("::not-an-origin::")),
            "https://api.journal.kz/api/"
        );
        assert_eq!(resolve(Some("/api/"), Some("::nope")), FALLBACK_API_BASE);
    }

    #[test]
    fn test_result_always_ends_with_slash() {
        let cases = [
            (Some("http://h/a/b"), None),
            (Some("a/b/c"), Some("http://h:1")),
            (Some("http://h"), None),
        ];
        for (configured, origin) in cases {
            assert!(resolve(configured, origin).ends_with('/'));
        }
    }

    #[test]
    fn test_slash_helpers() {
        assert_eq!(ensure_trailing_slash("a"), "a/");
        assert_eq!(ensure_trailing_slash("a/"), "a/");
        assert_eq!(ensure_leading_slash("a"), "/a");
        assert_eq!(ensure_leading_slash("/a"), "/a");
    }
}
