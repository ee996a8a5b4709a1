//! Layer catalogue and per-layer detail handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use serde::Serialize;
use tracing::debug;

use strata_core::{logging, LayerSummary};

use crate::middleware::{cached_json, CachePolicy};
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct LayersResponse {
    pub total_layers: usize,
    pub layers: Vec<LayerSummary>,
}

/// GET /layers
pub async fn list_layers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let dataset = state.dataset().await?;
    let layers = strata_core::layer_catalogue(&dataset.entries);

    let body = LayersResponse {
        total_layers: layers.len(),
        layers,
    };
    Ok(cached_json(
        &headers,
        Some(&dataset.fingerprint),
        CachePolicy::DATA,
        &body,
    ))
}

/// All posts carrying one layer, grouped by year.
///
/// GET /layer/:layer_name
pub async fn get_layer(
    State(state): State<AppState>,
    Path(layer_name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let dataset = state.dataset().await?;
    let detail = strata_core::layer_detail(&dataset.entries, &layer_name)?;
    debug!(
        subsystem = logging::SUBSYSTEM_API,
        op = "layer_detail",
        layer = %layer_name,
        result_count = detail.total_posts,
        "Layer detail served"
    );

    Ok(cached_json(
        &headers,
        Some(&dataset.fingerprint),
        CachePolicy::DATA,
        &detail,
    ))
}
