use axum::{extract::State, http::HeaderMap, response::Response};

use crate::middleware::{cached_json, CachePolicy};
use crate::{ApiError, AppState};

/// GET /stats
pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let dataset = state.dataset().await?;
    let stats = strata_core::timeline_stats(&dataset.entries);

    Ok(cached_json(
        &headers,
        Some(&dataset.fingerprint),
        CachePolicy::DATA,
        &stats,
    ))
}
