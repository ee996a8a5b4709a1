//! Core data models for strata.
//!
//! These types describe the timeline artifact as it is held in memory after
//! loading. Shape tolerance lives in the deserializers: missing or null
//! `title`/`snippet` become empty strings and missing or null `layers` become
//! an empty list, so query code never has to guard against absent fields.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::snippet::is_placeholder_snippet;

// =============================================================================
// ENTRY
// =============================================================================

/// One dated article/post in the architecture timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    /// `YYYY-MM-DD`; empty strings normalize to `None`.
    #[serde(default, deserialize_with = "date_or_null")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "layers_or_null")]
    pub layers: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub snippet: String,
    /// Source markdown document, used only for snippet enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Any other fields the pipeline emitted (url, author, ...), passed through.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Entry {
    /// Minimal entry, mostly useful for tests and fixtures.
    pub fn new(title: impl Into<String>, date: Option<&str>, layers: &[&str]) -> Self {
        Self {
            title: title.into(),
            date: date.filter(|d| !d.is_empty()).map(str::to_string),
            layers: layers.iter().map(|l| l.to_string()).collect(),
            snippet: String::new(),
            path: None,
            extra: Map::new(),
        }
    }

    pub fn has_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l == layer)
    }

    /// True when `wanted` is empty (no filter) or shares at least one layer.
    pub fn matches_any_layer(&self, wanted: &[String]) -> bool {
        wanted.is_empty() || wanted.iter().any(|w| self.has_layer(w))
    }

    /// Calendar year: the first four characters of `date`.
    pub fn year(&self) -> Option<&str> {
        let date = self.date.as_deref()?;
        Some(match date.char_indices().nth(4) {
            Some((idx, _)) => &date[..idx],
            None => date,
        })
    }

    /// Whether the stored snippet is an auto-generated "N min read" stub.
    pub fn has_placeholder_snippet(&self) -> bool {
        is_placeholder_snippet(&self.snippet)
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn date_or_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|d| !d.trim().is_empty()))
}

fn layers_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// DATE RANGE
// =============================================================================

/// Earliest and latest date among a set of entries. Dateless entries are
/// ignored; both bounds are `None` when nothing is dated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl DateRange {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut range = DateRange::default();
        for date in entries.into_iter().filter_map(|e| e.date.as_deref()) {
            if range.earliest.as_deref().map_or(true, |cur| date < cur) {
                range.earliest = Some(date.to_string());
            }
            if range.latest.as_deref().map_or(true, |cur| date > cur) {
                range.latest = Some(date.to_string());
            }
        }
        range
    }
}

// =============================================================================
// LOADED DATASET
// =============================================================================

/// The process-wide timeline snapshot. Immutable once published by
/// [`crate::DatasetStore`].
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub entries: Vec<Entry>,
    /// Lowercase hex MD5 of the raw source bytes; doubles as the HTTP ETag.
    pub fingerprint: String,
    pub source: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDataset {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_null_fields_normalize() {
        let entry: Entry = serde_json::from_value(json!({
            "title": null,
            "date": "",
            "layers": null,
            "snippet": null
        }))
        .unwrap();

        assert_eq!(entry.title, "");
        assert_eq!(entry.date, None);
        assert!(entry.layers.is_empty());
        assert_eq!(entry.snippet, "");
        assert_eq!(entry.path, None);
    }

    #[test]
    fn test_entry_missing_fields_default() {
        let entry: Entry = serde_json::from_value(json!({})).unwrap();
        assert_eq!(entry.title, "");
        assert!(entry.layers.is_empty());
    }

    #[test]
    fn test_entry_extra_fields_round_through() {
        let entry: Entry = serde_json::from_value(json!({
            "title": "Zuul 2",
            "date": "2016-09-21",
            "layers": ["backend-apis"],
            "snippet": "Async gateway",
            "url": "https://example.com/zuul-2"
        }))
        .unwrap();

        assert_eq!(entry.extra.get("url"), Some(&json!("https://example.com/zuul-2")));

        let out = serde_json::to_value(&entry).unwrap();
        assert_eq!(out["url"], "https://example.com/zuul-2");
        assert_eq!(out["date"], "2016-09-21");
        assert!(out.get("path").is_none());
    }

    #[test]
    fn test_dateless_entry_serializes_null_date() {
        let entry = Entry::new("Undated", None, &[]);
        let out = serde_json::to_value(&entry).unwrap();
        assert!(out["date"].is_null());
        assert_eq!(out["layers"], json!([]));
    }

    #[test]
    fn test_matches_any_layer() {
        let entry = Entry::new("A", Some("2020-01-01"), &["data", "streaming"]);
        assert!(entry.matches_any_layer(&[]));
        assert!(entry.matches_any_layer(&["streaming".to_string()]));
        assert!(entry.matches_any_layer(&["ui".to_string(), "data".to_string()]));
        assert!(!entry.matches_any_layer(&["ui".to_string()]));
    }

    #[test]
    fn test_year_is_first_four_chars() {
        assert_eq!(Entry::new("A", Some("2019-03-02"), &[]).year(), Some("2019"));
        assert_eq!(Entry::new("A", Some("201"), &[]).year(), Some("201"));
        assert_eq!(Entry::new("A", None, &[]).year(), None);
    }

    #[test]
    fn test_date_range_ignores_dateless() {
        let entries = vec![
            Entry::new("A", Some("2018-05-01"), &[]),
            Entry::new("B", None, &[]),
            Entry::new("C", Some("2012-01-10"), &[]),
            Entry::new("D", Some("2021-11-30"), &[]),
        ];
        let range = DateRange::from_entries(&entries);
        assert_eq!(range.earliest.as_deref(), Some("2012-01-10"));
        assert_eq!(range.latest.as_deref(), Some("2021-11-30"));
    }

    #[test]
    fn test_date_range_empty_when_nothing_dated() {
        let entries = vec![Entry::new("A", None, &[])];
        assert_eq!(DateRange::from_entries(&entries), DateRange::default());
    }
}
