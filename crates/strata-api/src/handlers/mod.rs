//! HTTP handlers for strata-api.

pub mod layers;
pub mod stats;
pub mod timeline;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::middleware::{cached_json, CachePolicy};
use crate::{ApiError, AppState};

pub use layers::{get_layer, list_layers};
pub use stats::get_stats;
pub use timeline::{get_timeline, search_entries};

/// Service banner listing the available endpoints.
///
/// GET /
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let body = json!({
        "message": "Architecture timeline API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/timeline": "Entries filtered by layers, date range and limit",
            "/layers": "All layers with post counts and date ranges",
            "/stats": "Aggregate statistics over the timeline",
            "/search": "Case-insensitive search over titles and snippets",
            "/layer/{layer_name}": "All posts for one layer, grouped by year",
            "/health": "Liveness and dataset status",
        },
    });

    cached_json(
        &headers,
        state.fingerprint().as_deref(),
        CachePolicy::ROOT,
        &body,
    )
}

/// Liveness probe. Reports dataset status without forcing a load.
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    let dataset = match state.store.get() {
        Some(d) => json!({
            "loaded": true,
            "entries": d.len(),
            "fingerprint": d.fingerprint,
            "source": d.source.display().to_string(),
            "loaded_at": d.loaded_at.to_rfc3339(),
        }),
        None => json!({
            "loaded": false,
            "entries": 0,
            "fingerprint": null,
            "source": null,
            "loaded_at": null,
        }),
    };

    let body = Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset": dataset,
    }));

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        body,
    )
        .into_response()
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
