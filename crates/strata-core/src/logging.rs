//! Structured logging schema for strata.
//!
//! Every crate emits `tracing` events with the field names listed here so log
//! aggregation tools can query across subsystems with one vocabulary.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, dataset load), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (per-entry enrichment, per-candidate probing) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request (`x-request-id`, UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event. Values: see `SUBSYSTEM_*`.
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem. Values: see `COMPONENT_*`.
pub const COMPONENT: &str = "component";

/// Logical operation name ("load", "enrich", "timeline", "search", ...).
pub const OPERATION: &str = "op";

// ─── Subsystem values ──────────────────────────────────────────────────────

/// Dataset loading and enrichment.
pub const SUBSYSTEM_DATASET: &str = "dataset";

/// Query and aggregation over the loaded dataset.
pub const SUBSYSTEM_QUERY: &str = "query";

/// HTTP presentation boundary.
pub const SUBSYSTEM_API: &str = "api";

// ─── Component values ──────────────────────────────────────────────────────

/// The one-shot dataset loader.
pub const COMPONENT_LOADER: &str = "loader";

/// The markdown snippet extractor.
pub const COMPONENT_SNIPPET: &str = "snippet";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Filesystem path being read.
pub const PATH: &str = "path";

/// Layer name being queried.
pub const LAYER: &str = "layer";

/// Search query text.
pub const QUERY: &str = "query";

/// Dataset fingerprint (MD5 of raw bytes).
pub const FINGERPRINT: &str = "fingerprint";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of entries in the loaded dataset.
pub const ENTRY_COUNT: &str = "entry_count";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of placeholder snippets replaced during load.
pub const ENRICHED_COUNT: &str = "enriched_count";

/// Byte length of the raw dataset file.
pub const BYTES: &str = "bytes";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
