//! Timeline listing and full-text search handlers.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Serialize;
use tracing::debug;

use strata_core::{logging, Entry};

use crate::middleware::{cached_json, CachePolicy};
use crate::query_types::{search_query, timeline_query};
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct TimelineResponse<'a> {
    pub count: usize,
    pub entries: Vec<&'a Entry>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub query: &'a str,
    pub count: usize,
    pub results: Vec<&'a Entry>,
}

/// Entries in dataset order, optionally filtered by layers and date range.
///
/// GET /timeline?layers=a&layers=b&start_date=..&end_date=..&limit=N
pub async fn get_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = timeline_query(&pairs)?;
    let dataset = state.dataset().await?;

    let entries = strata_core::timeline(&dataset.entries, &query)?;
    debug!(
        subsystem = logging::SUBSYSTEM_API,
        op = "timeline",
        layers = ?query.layers,
        result_count = entries.len(),
        "Timeline query served"
    );

    let body = TimelineResponse {
        count: entries.len(),
        entries,
    };
    Ok(cached_json(
        &headers,
        Some(&dataset.fingerprint),
        CachePolicy::DATA,
        &body,
    ))
}

/// Case-insensitive substring search over titles and snippets.
///
/// GET /search?q=..&layers=..
pub async fn search_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = search_query(&pairs)?;
    let dataset = state.dataset().await?;

    let results = strata_core::search(&dataset.entries, &query)?;
    debug!(
        subsystem = logging::SUBSYSTEM_API,
        op = "search",
        query = %query.q,
        result_count = results.len(),
        "Search served"
    );

    let body = SearchResponse {
        query: &query.q,
        count: results.len(),
        results,
    };
    Ok(cached_json(
        &headers,
        Some(&dataset.fingerprint),
        CachePolicy::SEARCH,
        &body,
    ))
}
