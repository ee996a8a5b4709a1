//! HTTP cache metadata for dataset-backed responses.
//!
//! Every response carries `Cache-Control: public, max-age=N` and an `ETag`
//! equal to the dataset fingerprint. Because the dataset never changes for
//! the life of the process, a client presenting the current tag in
//! `If-None-Match` gets `304 Not Modified` without the body being rendered.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use strata_core::defaults;

/// Per-endpoint freshness lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_secs: u64,
}

impl CachePolicy {
    /// Service metadata root (24 hours).
    pub const ROOT: CachePolicy = CachePolicy {
        max_age_secs: defaults::CACHE_MAX_AGE_ROOT_SECS,
    };
    /// Timeline, layers, stats, layer detail (1 hour).
    pub const DATA: CachePolicy = CachePolicy {
        max_age_secs: defaults::CACHE_MAX_AGE_DATA_SECS,
    };
    /// Search results (5 minutes).
    pub const SEARCH: CachePolicy = CachePolicy {
        max_age_secs: defaults::CACHE_MAX_AGE_SEARCH_SECS,
    };

    pub fn header_value(&self) -> HeaderValue {
        // Digits and ASCII only, always a valid header value.
        HeaderValue::from_str(&format!("public, max-age={}", self.max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static("public"))
    }
}

/// Strong entity tag for a dataset fingerprint.
pub fn entity_tag(fingerprint: &str) -> String {
    format!("\"{}\"", fingerprint)
}

/// Whether `If-None-Match` lists the current fingerprint (quoted, bare, weak,
/// or `*`).
pub fn is_not_modified(request_headers: &HeaderMap, fingerprint: &str) -> bool {
    request_headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|tag| {
            let tag = tag.strip_prefix("W/").unwrap_or(tag);
            tag == "*" || tag.trim_matches('"') == fingerprint
        })
}

fn cache_headers(policy: CachePolicy, fingerprint: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, policy.header_value());
    if let Some(fp) = fingerprint {
        match HeaderValue::from_str(&entity_tag(fp)) {
            Ok(etag) => {
                headers.insert(header::ETAG, etag);
            }
            Err(e) => tracing::warn!(subsystem = "api", error = %e, "Fingerprint is not a valid ETag"),
        }
    }
    headers
}

/// Render `body` as JSON with cache headers, or a bare 304 when the client
/// already holds the current representation.
///
/// `fingerprint` is `None` only when no dataset has been loaded yet, in which
/// case no `ETag` is sent and revalidation is skipped.
pub fn cached_json<T: Serialize>(
    request_headers: &HeaderMap,
    fingerprint: Option<&str>,
    policy: CachePolicy,
    body: &T,
) -> Response {
    let headers = cache_headers(policy, fingerprint);
    if let Some(fp) = fingerprint {
        if is_not_modified(request_headers, fp) {
            return (StatusCode::NOT_MODIFIED, headers).into_response();
        }
    }
    (StatusCode::OK, headers, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FP: &str = "0cc175b9c0f1b6a831c399e269772661";

    fn with_if_none_match(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_policy_header_values() {
        assert_eq!(CachePolicy::ROOT.header_value(), "public, max-age=86400");
        assert_eq!(CachePolicy::DATA.header_value(), "public, max-age=3600");
        assert_eq!(CachePolicy::SEARCH.header_value(), "public, max-age=300");
    }

    #[test]
    fn test_entity_tag_is_quoted() {
        assert_eq!(entity_tag(FP), format!("\"{}\"", FP));
    }

    #[test]
    fn test_if_none_match_forms() {
        assert!(is_not_modified(&with_if_none_match(&format!("\"{}\"", FP)), FP));
        assert!(is_not_modified(&with_if_none_match(FP), FP));
        assert!(is_not_modified(&with_if_none_match(&format!("W/\"{}\"", FP)), FP));
        assert!(is_not_modified(&with_if_none_match(&format!("\"other\", \"{}\"", FP)), FP));
        assert!(is_not_modified(&with_if_none_match("*"), FP));
        assert!(!is_not_modified(&with_if_none_match("\"stale\""), FP));
        assert!(!is_not_modified(&HeaderMap::new(), FP));
    }

    #[test]
    fn test_cached_json_ok_carries_headers() {
        let response = cached_json(&HeaderMap::new(), Some(FP), CachePolicy::DATA, &[1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(response.headers()[header::ETAG], entity_tag(FP).as_str());
    }

    #[test]
    fn test_cached_json_not_modified() {
        let headers = with_if_none_match(&entity_tag(FP));
        let response = cached_json(&headers, Some(FP), CachePolicy::SEARCH, &"body");
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=300");
    }

    #[test]
    fn test_cached_json_without_fingerprint_has_no_etag() {
        let headers = with_if_none_match("*");
        let response = cached_json(&headers, None, CachePolicy::ROOT, &"body");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ETAG).is_none());
    }
}
