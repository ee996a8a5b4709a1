//! strata-api - read-only HTTP API over the architecture timeline

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query_types;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use error::ApiError;
pub use state::AppState;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// CORS
// =============================================================================

/// Origins allowed to read the API from a browser.
///
/// `ALLOWED_ORIGINS` is a comma-separated list. Unset, empty, or `*` allows
/// any origin.
///
/// ```text
/// ALLOWED_ORIGINS=https://timeline.example.com,http://localhost:3000
/// ```
pub fn parse_allowed_origins(raw: Option<&str>) -> AllowOrigin {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() || raw == "*" {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    }
}

fn cors_layer(allow_origin: AllowOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::IF_NONE_MATCH])
        .expose_headers([header::ETAG, header::CACHE_CONTROL])
        .max_age(std::time::Duration::from_secs(3600))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Full application router with CORS open to any origin.
pub fn router(state: AppState) -> Router {
    router_with_origins(state, AllowOrigin::any())
}

/// Application router with an explicit CORS origin policy.
pub fn router_with_origins(state: AppState, allow_origin: AllowOrigin) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/timeline", get(handlers::get_timeline))
        .route("/layers", get(handlers::list_layers))
        .route("/stats", get(handlers::get_stats))
        .route("/search", get(handlers::search_entries))
        .route("/layer/:layer_name", get(handlers::get_layer))
        .fallback(handlers::not_found)
        // Applied innermost-first (Router::layer wraps outward), so CORS is
        // outermost and tracing innermost.
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allow_origin))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_uuid_v7() {
        let mut maker = MakeRequestUuidV7;
        let request = axum::http::Request::new(());
        let id = maker.make_request_id(&request).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
