//! Query and aggregation over the loaded timeline.
//!
//! Every function here is a pure read over `&[Entry]`: no I/O, no mutation,
//! no caching. Results borrow from the dataset so handlers can serialize
//! them without cloning entries. Validation happens before any filtering.

use std::collections::{BTreeMap, HashMap};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{DateRange, Entry};

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Filters for [`timeline`]. Empty `layers` means no layer filter; empty
/// date strings are treated as absent bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineQuery {
    pub layers: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

/// Parameters for [`search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub layers: Vec<String>,
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One row of the layer catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub count: usize,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// Layer → occurrence count, serialized as a JSON object in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerDistribution(pub Vec<(String, usize)>);

impl LayerDistribution {
    pub fn get(&self, layer: &str) -> Option<usize> {
        self.0.iter().find(|(name, _)| name == layer).map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }
}

impl Serialize for LayerDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Whole-dataset statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStats {
    pub total_posts: usize,
    pub date_range: DateRange,
    pub posts_per_year: BTreeMap<String, usize>,
    pub layer_distribution: LayerDistribution,
    pub multi_layer_posts: usize,
    pub avg_layers_per_post: f64,
}

/// All posts for one layer, grouped by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDetail<'a> {
    pub layer: String,
    pub total_posts: usize,
    pub date_range: DateRange,
    pub posts_by_year: BTreeMap<String, Vec<&'a Entry>>,
    pub posts: Vec<&'a Entry>,
}

// =============================================================================
// LAYER INDEX
// =============================================================================

/// Layer name → entries carrying it, in first-appearance order. Built per
/// query and dropped with it.
pub fn layer_index(entries: &[Entry]) -> Vec<(&str, Vec<&Entry>)> {
    let mut index: Vec<(&str, Vec<&Entry>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        for layer in &entry.layers {
            let slot = *slots.entry(layer.as_str()).or_insert_with(|| {
                index.push((layer.as_str(), Vec::new()));
                index.len() - 1
            });
            // A layer repeated on one entry still counts that entry once.
            if index[slot].1.last().map_or(true, |last| !std::ptr::eq(*last, entry)) {
                index[slot].1.push(entry);
            }
        }
    }
    index
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Filtered timeline listing, in dataset order.
pub fn timeline<'a>(entries: &'a [Entry], query: &TimelineQuery) -> Result<Vec<&'a Entry>> {
    if let Some(limit) = query.limit {
        if limit < 1 {
            return Err(Error::invalid_query("limit", "must be >= 1"));
        }
    }

    let start = query.start_date.as_deref().filter(|d| !d.is_empty());
    let end = query.end_date.as_deref().filter(|d| !d.is_empty());

    let matching = entries.iter().filter(|e| {
        e.matches_any_layer(&query.layers) && within_dates(e.date.as_deref(), start, end)
    });

    Ok(match query.limit {
        Some(limit) => matching.take(usize::try_from(limit).unwrap_or(usize::MAX)).collect(),
        None => matching.collect(),
    })
}

fn within_dates(date: Option<&str>, start: Option<&str>, end: Option<&str>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

/// Every layer with its post count and date span, most populated first.
/// Equal counts are ordered by layer name.
pub fn layer_catalogue(entries: &[Entry]) -> Vec<LayerSummary> {
    let mut catalogue: Vec<LayerSummary> = layer_index(entries)
        .into_iter()
        .map(|(name, posts)| {
            let range = DateRange::from_entries(posts.iter().copied());
            LayerSummary {
                name: name.to_string(),
                count: posts.len(),
                earliest: range.earliest,
                latest: range.latest,
            }
        })
        .collect();

    catalogue.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    catalogue
}

/// Aggregate statistics across the whole dataset.
pub fn timeline_stats(entries: &[Entry]) -> TimelineStats {
    let mut posts_per_year: BTreeMap<String, usize> = BTreeMap::new();
    for year in entries.iter().filter_map(Entry::year) {
        *posts_per_year.entry(year.to_string()).or_default() += 1;
    }

    let mut layer_counts: HashMap<&str, usize> = HashMap::new();
    for layer in entries.iter().flat_map(|e| e.layers.iter()) {
        *layer_counts.entry(layer.as_str()).or_default() += 1;
    }
    let mut distribution: Vec<(String, usize)> = layer_counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let occurrences: usize = entries.iter().map(|e| e.layers.len()).sum();
    let avg_layers_per_post = if entries.is_empty() {
        0.0
    } else {
        occurrences as f64 / entries.len() as f64
    };

    TimelineStats {
        total_posts: entries.len(),
        date_range: DateRange::from_entries(entries),
        posts_per_year,
        layer_distribution: LayerDistribution(distribution),
        multi_layer_posts: entries.iter().filter(|e| e.layers.len() > 1).count(),
        avg_layers_per_post,
    }
}

/// Case-insensitive keyword search over title and snippet, then layer filter.
pub fn search<'a>(entries: &'a [Entry], query: &SearchQuery) -> Result<Vec<&'a Entry>> {
    if query.q.chars().count() < defaults::SEARCH_MIN_CHARS {
        return Err(Error::invalid_query(
            "q",
            format!("must be at least {} characters", defaults::SEARCH_MIN_CHARS),
        ));
    }

    let needle = query.q.to_lowercase();
    Ok(entries
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&needle) || e.snippet.to_lowercase().contains(&needle)
        })
        .filter(|e| e.matches_any_layer(&query.layers))
        .collect())
}

/// All posts for `layer`, with a per-year grouping of the dated ones.
pub fn layer_detail<'a>(entries: &'a [Entry], layer: &str) -> Result<LayerDetail<'a>> {
    let posts: Vec<&Entry> = entries.iter().filter(|e| e.has_layer(layer)).collect();
    if posts.is_empty() {
        return Err(Error::LayerNotFound(layer.to_string()));
    }

    let mut posts_by_year: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
    for post in posts.iter().copied() {
        if let Some(year) = post.year() {
            posts_by_year.entry(year.to_string()).or_default().push(post);
        }
    }

    Ok(LayerDetail {
        layer: layer.to_string(),
        total_posts: posts.len(),
        date_range: DateRange::from_entries(posts.iter().copied()),
        posts_by_year,
        posts,
    })
}
