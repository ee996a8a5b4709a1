//! Timeline dataset loading.
//!
//! [`DatasetStore`] owns the process-wide [`LoadedDataset`]. The first call to
//! [`DatasetStore::ensure_loaded`] probes the candidate locations, reads and
//! parses the artifact, fingerprints the raw bytes, enriches placeholder
//! snippets, and publishes the result. Concurrent first callers block on the
//! same one-shot cell; exactly one of them performs the load and all of them
//! observe the same fully enriched snapshot. A failed load leaves the cell
//! empty so a later call can try again.
//!
//! ## Accepted shapes
//!
//! | Shape | Handling |
//! |-------|----------|
//! | `{"entries": [...]}` | used as-is |
//! | `[...]` | used as-is |
//! | `{"per_layer": {layer: [...]}}` | posts merged into entries, layers accumulated |
//! | any other object | zero entries (WARN) |

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, trace, warn};

use crate::defaults;
use crate::error::{Error, Result};
use crate::logging;
use crate::models::{Entry, LoadedDataset};
use crate::snippet::SnippetExtractor;

// =============================================================================
// SOURCE RESOLUTION
// =============================================================================

/// Ordered list of locations the timeline artifact may live at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    candidates: Vec<PathBuf>,
}

impl DatasetSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// A single explicit file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(vec![path.into()])
    }

    /// Standard probing order: refined before original, operator mount before
    /// repository outputs within each variant.
    pub fn from_dirs(data_dir: impl AsRef<Path>, outputs_dir: impl AsRef<Path>) -> Self {
        let (data_dir, outputs_dir) = (data_dir.as_ref(), outputs_dir.as_ref());
        Self::new(vec![
            data_dir.join(defaults::REFINED_TIMELINE_FILE),
            outputs_dir.join(defaults::REFINED_TIMELINE_FILE),
            data_dir.join(defaults::TIMELINE_FILE),
            outputs_dir.join(defaults::TIMELINE_FILE),
        ])
    }

    /// Reads:
    /// - `STRATA_TIMELINE_PATH` (when set, the only candidate)
    /// - `STRATA_DATA_DIR` (default: `/data`)
    /// - `STRATA_OUTPUTS_DIR` (default: `outputs`)
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(defaults::ENV_TIMELINE_PATH) {
            return Self::file(path);
        }
        let data_dir =
            std::env::var(defaults::ENV_DATA_DIR).unwrap_or_else(|_| defaults::DATA_DIR.to_string());
        let outputs_dir = std::env::var(defaults::ENV_OUTPUTS_DIR)
            .unwrap_or_else(|_| defaults::OUTPUTS_DIR.to_string());
        Self::from_dirs(data_dir, outputs_dir)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub fn resolve(&self) -> Result<&Path> {
        for candidate in &self.candidates {
            trace!(
                subsystem = logging::SUBSYSTEM_DATASET,
                component = logging::COMPONENT_LOADER,
                path = %candidate.display(),
                "Probing dataset candidate"
            );
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(Error::DatasetNotFound {
            candidates: self.candidates.clone(),
        })
    }
}

// =============================================================================
// STORE
// =============================================================================

/// One-shot holder of the loaded timeline.
pub struct DatasetStore {
    source: DatasetSource,
    extractor: SnippetExtractor,
    snippet_length: usize,
    cell: OnceCell<Arc<LoadedDataset>>,
    loads: AtomicUsize,
}

impl DatasetStore {
    pub fn new(source: DatasetSource, extractor: SnippetExtractor) -> Self {
        Self {
            source,
            extractor,
            snippet_length: defaults::SNIPPET_LENGTH,
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Store configured from the environment (see [`DatasetSource::from_env`],
    /// [`SnippetExtractor::from_env`], and `STRATA_SNIPPET_LENGTH`).
    pub fn from_env() -> Self {
        let snippet_length = std::env::var(defaults::ENV_SNIPPET_LENGTH)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::SNIPPET_LENGTH);
        Self::new(DatasetSource::from_env(), SnippetExtractor::from_env())
            .with_snippet_length(snippet_length)
    }

    pub fn with_snippet_length(mut self, snippet_length: usize) -> Self {
        self.snippet_length = snippet_length;
        self
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Load the dataset if nobody has yet, then return the shared snapshot.
    pub fn ensure_loaded(&self) -> Result<Arc<LoadedDataset>> {
        self.cell
            .get_or_try_init(|| self.load().map(Arc::new))
            .cloned()
    }

    /// The snapshot, if a load has already completed.
    pub fn get(&self) -> Option<Arc<LoadedDataset>> {
        self.cell.get().cloned()
    }

    /// Number of load attempts that read the file (successful or not).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn load(&self) -> Result<LoadedDataset> {
        let start = Instant::now();
        self.loads.fetch_add(1, Ordering::SeqCst);

        let path = self.source.resolve()?.to_path_buf();
        info!(
            subsystem = logging::SUBSYSTEM_DATASET,
            component = logging::COMPONENT_LOADER,
            op = "load",
            path = %path.display(),
            "Loading timeline dataset"
        );

        let raw = std::fs::read(&path)?;
        let fingerprint = fingerprint(&raw);
        let mut entries = parse_entries(&raw)?;
        let enriched = enrich_snippets(&mut entries, &self.extractor, self.snippet_length);

        info!(
            subsystem = logging::SUBSYSTEM_DATASET,
            component = logging::COMPONENT_LOADER,
            op = "load",
            path = %path.display(),
            bytes = raw.len(),
            entry_count = entries.len(),
            enriched_count = enriched,
            fingerprint = %fingerprint,
            duration_ms = start.elapsed().as_millis() as u64,
            "Timeline dataset loaded"
        );

        Ok(LoadedDataset {
            entries,
            fingerprint,
            source: path,
            loaded_at: Utc::now(),
        })
    }
}

// =============================================================================
// PARSING & NORMALIZATION
// =============================================================================

/// Lowercase hex MD5 of the raw dataset bytes.
pub fn fingerprint(raw: &[u8]) -> String {
    format!("{:x}", md5::compute(raw))
}

/// Parse raw artifact bytes into entries, whatever the on-disk shape.
pub fn parse_entries(raw: &[u8]) -> Result<Vec<Entry>> {
    let value: JsonValue = serde_json::from_slice(raw)?;
    normalize(value)
}

fn normalize(value: JsonValue) -> Result<Vec<Entry>> {
    match value {
        JsonValue::Array(items) => entries_from_array(items),
        JsonValue::Object(mut obj) => {
            if let Some(entries) = obj.remove("entries") {
                return match entries {
                    JsonValue::Array(items) => entries_from_array(items),
                    other => Err(Error::DatasetParse(format!(
                        "'entries' must be an array, found {}",
                        json_kind(&other)
                    ))),
                };
            }
            match obj.remove("per_layer") {
                Some(JsonValue::Object(per_layer)) => entries_from_per_layer(per_layer),
                Some(other) => Err(Error::DatasetParse(format!(
                    "'per_layer' must be an object, found {}",
                    json_kind(&other)
                ))),
                None => {
                    warn!(
                        subsystem = logging::SUBSYSTEM_DATASET,
                        component = logging::COMPONENT_LOADER,
                        "Dataset object has neither 'entries' nor 'per_layer'; serving no entries"
                    );
                    Ok(Vec::new())
                }
            }
        }
        other => Err(Error::DatasetParse(format!(
            "expected an object or array at top level, found {}",
            json_kind(&other)
        ))),
    }
}

fn entries_from_array(items: Vec<JsonValue>) -> Result<Vec<Entry>> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::DatasetParse(format!("entry {}: {}", idx, e)))
        })
        .collect()
}

/// Merge the legacy layer → posts mapping into one entry per post.
fn entries_from_per_layer(per_layer: Map<String, JsonValue>) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (layer, posts) in per_layer {
        let posts = match posts {
            JsonValue::Array(posts) => posts,
            other => {
                return Err(Error::DatasetParse(format!(
                    "per_layer['{}'] must be an array, found {}",
                    layer,
                    json_kind(&other)
                )))
            }
        };

        for post in posts {
            let post: Entry = serde_json::from_value(post)
                .map_err(|e| Error::DatasetParse(format!("per_layer['{}']: {}", layer, e)))?;
            let key = identity_key(&post);

            let idx = match seen.get(&key) {
                Some(&idx) => idx,
                None => {
                    seen.insert(key, entries.len());
                    entries.push(post);
                    entries.len() - 1
                }
            };
            if !entries[idx].has_layer(&layer) {
                entries[idx].layers.push(layer.clone());
            }
        }
    }

    debug!(
        subsystem = logging::SUBSYSTEM_DATASET,
        component = logging::COMPONENT_LOADER,
        entry_count = entries.len(),
        "Rebuilt entries from legacy per_layer mapping"
    );
    Ok(entries)
}

fn identity_key(entry: &Entry) -> String {
    match &entry.path {
        Some(path) => format!("path:{}", path),
        None => format!(
            "post:{}\u{0}{}",
            entry.title,
            entry.date.as_deref().unwrap_or_default()
        ),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Replace placeholder snippets in place. Returns how many were replaced.
pub fn enrich_snippets(entries: &mut [Entry], extractor: &SnippetExtractor, max_length: usize) -> usize {
    let mut enriched = 0;
    for entry in entries.iter_mut().filter(|e| e.has_placeholder_snippet()) {
        let Some(path) = entry.path.as_deref() else {
            continue;
        };
        match extractor.extract(path, max_length) {
            Some(snippet) if !snippet.is_empty() => {
                trace!(
                    subsystem = logging::SUBSYSTEM_DATASET,
                    component = logging::COMPONENT_SNIPPET,
                    path = path,
                    "Enriched placeholder snippet"
                );
                entry.snippet = snippet;
                enriched += 1;
            }
            _ => {}
        }
    }
    enriched
}
