//! Snippet enrichment from source markdown documents.
//!
//! Timeline entries scraped from blog platforms often carry a useless
//! `"5 min read"` snippet. [`SnippetExtractor`] replaces it with the first
//! prose lines of the entry's source document.
//!
//! ## Resolution Order
//!
//! 1. Memo lookup keyed by `(path, max_length)`
//! 2. The path as given
//! 3. The path re-rooted under the alternate root, when it contains `/outputs/`
//! 4. Memoize the outcome (including "not found")
//!
//! ## Error Handling
//!
//! Enrichment is best effort. A missing or unreadable document yields `None`
//! and the caller keeps the placeholder; nothing is surfaced to clients.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::defaults;
use crate::logging;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s+min read$").expect("placeholder pattern is valid"));

/// Whether `snippet` is an auto-generated "N min read" stub eligible for
/// enrichment.
pub fn is_placeholder_snippet(snippet: &str) -> bool {
    snippet.chars().count() < defaults::PLACEHOLDER_MAX_CHARS && PLACEHOLDER.is_match(snippet.trim())
}

type MemoKey = (String, usize);

/// Extracts preview text from markdown documents, with a bounded memo.
pub struct SnippetExtractor {
    alt_root: PathBuf,
    memo: Mutex<LruCache<MemoKey, Option<String>>>,
}

impl SnippetExtractor {
    /// Create an extractor that re-roots `/outputs/` paths under `alt_root`.
    pub fn new(alt_root: impl Into<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(defaults::SNIPPET_CACHE_CAPACITY)
            .expect("snippet cache capacity must be non-zero");
        Self {
            alt_root: alt_root.into(),
            memo: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Reads `STRATA_SNIPPET_ROOT` (default: `/outputs`).
    pub fn from_env() -> Self {
        let root = std::env::var(defaults::ENV_SNIPPET_ROOT)
            .unwrap_or_else(|_| defaults::SNIPPET_ROOT.to_string());
        Self::new(root)
    }

    pub fn alt_root(&self) -> &Path {
        &self.alt_root
    }

    /// Number of memoized lookups currently held.
    pub fn cached_len(&self) -> usize {
        self.memo.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Derive a snippet of at most `max_length` characters from `source_path`.
    ///
    /// Returns `None` when the document cannot be located or read. A readable
    /// document with no usable prose yields the fixed fallback text.
    pub fn extract(&self, source_path: &str, max_length: usize) -> Option<String> {
        let key = (source_path.to_string(), max_length);
        {
            let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = memo.get(&key) {
                return hit.clone();
            }
        }

        let snippet = self
            .read_document(source_path)
            .map(|content| extract_from_markdown(&content, max_length));

        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        memo.put(key, snippet.clone());
        snippet
    }

    /// The path as given if it exists, else the `/outputs/` rewrite if that exists.
    pub fn resolve(&self, source_path: &str) -> Option<PathBuf> {
        let direct = Path::new(source_path);
        if direct.exists() {
            return Some(direct.to_path_buf());
        }

        let (_, relative) = source_path.split_once(defaults::SNIPPET_REWRITE_SEGMENT)?;
        let rewritten = self.alt_root.join(relative);
        trace!(
            subsystem = logging::SUBSYSTEM_DATASET,
            component = logging::COMPONENT_SNIPPET,
            path = %rewritten.display(),
            "Trying re-rooted source path"
        );
        rewritten.exists().then_some(rewritten)
    }

    fn read_document(&self, source_path: &str) -> Option<String> {
        let Some(path) = self.resolve(source_path) else {
            debug!(
                subsystem = logging::SUBSYSTEM_DATASET,
                component = logging::COMPONENT_SNIPPET,
                path = source_path,
                "Source document not found, keeping placeholder"
            );
            return None;
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(
                    subsystem = logging::SUBSYSTEM_DATASET,
                    component = logging::COMPONENT_SNIPPET,
                    path = %path.display(),
                    error = %e,
                    "Source document unreadable, keeping placeholder"
                );
                None
            }
        }
    }
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        Self::new(defaults::SNIPPET_ROOT)
    }
}

/// Build a preview from markdown `content`.
///
/// Structural lines (headings, images, links, bullets, quotes, code fences)
/// and short lines are skipped. Surviving lines are joined with single spaces
/// until `max_length` characters are reached; overlong text is cut back to a
/// word boundary and suffixed with `...` so the result never exceeds
/// `max_length` characters.
pub fn extract_from_markdown(content: &str, max_length: usize) -> String {
    let mut snippet = String::new();
    let mut snippet_chars = 0usize;

    for line in content.lines().map(str::trim).filter(|l| is_prose_line(l)) {
        if !snippet.is_empty() {
            snippet.push(' ');
            snippet_chars += 1;
        }
        snippet.push_str(line);
        snippet_chars += line.chars().count();
        if snippet_chars >= max_length {
            break;
        }
    }

    if snippet.is_empty() {
        return defaults::SNIPPET_FALLBACK.to_string();
    }
    if snippet_chars > max_length {
        return truncate_at_word(&snippet, max_length);
    }
    snippet
}

fn is_prose_line(line: &str) -> bool {
    const STRUCTURAL: [char; 7] = ['#', '!', '[', '*', '-', '>', '`'];

    !line.is_empty()
        && !line.starts_with(STRUCTURAL)
        && line.chars().count() >= defaults::SNIPPET_MIN_LINE_CHARS
}

fn truncate_at_word(text: &str, max_length: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let budget = max_length.saturating_sub(defaults::SNIPPET_ELLIPSIS.chars().count());

    let mut end = budget.min(chars.len());
    // Only back off when the cut lands inside a word.
    if end < chars.len() && !chars[end].is_whitespace() {
        if let Some(boundary) = chars[..end].iter().rposition(|c| c.is_whitespace()) {
            end = boundary;
        }
    }

    let mut out: String = chars[..end].iter().collect();
    out.truncate(out.trim_end().len());
    out.push_str(defaults::SNIPPET_ELLIPSIS);
    out
}
