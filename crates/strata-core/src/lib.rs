//! # strata-core
//!
//! Core types and logic for the strata architecture-timeline service.
//!
//! This crate loads the pre-built timeline artifact once per process,
//! enriches placeholder snippets from source documents, and answers the
//! read-only queries the HTTP layer exposes. It has no knowledge of HTTP.

pub mod dataset;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod snippet;

// Re-export commonly used types at crate root
pub use dataset::{fingerprint, parse_entries, DatasetSource, DatasetStore};
pub use error::{Error, Result};
pub use models::*;
pub use query::{
    layer_catalogue, layer_detail, layer_index, search, timeline, timeline_stats, LayerDetail,
    LayerDistribution, LayerSummary, SearchQuery, TimelineQuery, TimelineStats,
};
pub use snippet::{extract_from_markdown, is_placeholder_snippet, SnippetExtractor};
