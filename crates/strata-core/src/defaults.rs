//! Centralized default constants for strata.
//!
//! **This module is the single source of truth** for shared default values.
//! The API crate and the loader reference these constants instead of
//! defining their own magic numbers.
//!
//! Organized by domain area.

// =============================================================================
// DATASET LOCATION
// =============================================================================

/// Environment variable naming an explicit dataset file (overrides probing).
pub const ENV_TIMELINE_PATH: &str = "STRATA_TIMELINE_PATH";

/// Environment variable for the operator-mounted data directory.
pub const ENV_DATA_DIR: &str = "STRATA_DATA_DIR";

/// Environment variable for the repository outputs directory.
pub const ENV_OUTPUTS_DIR: &str = "STRATA_OUTPUTS_DIR";

/// Default operator-mounted data directory.
pub const DATA_DIR: &str = "/data";

/// Default repository-relative outputs directory.
pub const OUTPUTS_DIR: &str = "outputs";

/// ML-reclassified timeline artifact (preferred).
pub const REFINED_TIMELINE_FILE: &str = "Netflix_timeline_refined.json";

/// Original timeline artifact.
pub const TIMELINE_FILE: &str = "Netflix_timeline.json";

// =============================================================================
// SNIPPET
// =============================================================================

/// Environment variable for the alternate root used by the snippet path rewrite.
pub const ENV_SNIPPET_ROOT: &str = "STRATA_SNIPPET_ROOT";

/// Environment variable overriding the enriched snippet length.
pub const ENV_SNIPPET_LENGTH: &str = "STRATA_SNIPPET_LENGTH";

/// Default alternate root for source documents (container mount).
pub const SNIPPET_ROOT: &str = "/outputs";

/// Path segment after which a source path is re-rooted.
pub const SNIPPET_REWRITE_SEGMENT: &str = "/outputs/";

/// Default snippet/preview length in characters.
pub const SNIPPET_LENGTH: usize = 200;

/// Maximum distinct `(path, max_length)` keys held by the snippet memo.
pub const SNIPPET_CACHE_CAPACITY: usize = 128;

/// Lines shorter than this (after trimming) never contribute to a snippet.
pub const SNIPPET_MIN_LINE_CHARS: usize = 30;

/// Placeholder snippets are strictly shorter than this.
pub const PLACEHOLDER_MAX_CHARS: usize = 15;

/// Returned when a readable document has no usable prose lines.
pub const SNIPPET_FALLBACK: &str = "No preview available";

/// Marker appended to truncated snippets.
pub const SNIPPET_ELLIPSIS: &str = "...";

// =============================================================================
// QUERY
// =============================================================================

/// Minimum search query length in characters.
pub const SEARCH_MIN_CHARS: usize = 2;

// =============================================================================
// HTTP CACHING
// =============================================================================

/// `Cache-Control` max-age for the service metadata root (24 hours).
pub const CACHE_MAX_AGE_ROOT_SECS: u64 = 86_400;

/// `Cache-Control` max-age for timeline, layers, stats and layer detail (1 hour).
pub const CACHE_MAX_AGE_DATA_SECS: u64 = 3_600;

/// `Cache-Control` max-age for search results (5 minutes).
pub const CACHE_MAX_AGE_SEARCH_SECS: u64 = 300;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;
