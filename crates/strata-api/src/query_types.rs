//! Query-string parsing for the timeline endpoints.
//!
//! Handlers extract the raw query as ordered `(key, value)` pairs so list
//! parameters can be given in any of the forms clients commonly send:
//!
//! - repeated keys: `?layers=data&layers=streaming`
//! - bracket keys: `?layers[]=data&layers[]=streaming`
//! - comma-separated: `?layers=data,streaming`
//!
//! Scalar parameters take the last occurrence.

use strata_core::{Error, SearchQuery, TimelineQuery};

/// Raw query pairs as extracted by `axum::extract::Query<Vec<(String, String)>>`.
pub type QueryPairs = [(String, String)];

const LAYERS: &str = "layers";
const LAYERS_BRACKET: &str = "layers[]";

/// Build a [`TimelineQuery`] from raw pairs. Rejects a non-integer `limit`;
/// range checks happen in the query engine.
pub fn timeline_query(pairs: &QueryPairs) -> Result<TimelineQuery, Error> {
    let limit = match last_value(pairs, "limit") {
        Some(raw) => Some(
            raw.trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid_query("limit", format!("expected an integer, got '{}'", raw)))?,
        ),
        None => None,
    };

    Ok(TimelineQuery {
        layers: layers(pairs),
        start_date: last_value(pairs, "start_date").map(str::to_string),
        end_date: last_value(pairs, "end_date").map(str::to_string),
        limit,
    })
}

/// Build a [`SearchQuery`] from raw pairs. `q` is required.
pub fn search_query(pairs: &QueryPairs) -> Result<SearchQuery, Error> {
    let q = last_value(pairs, "q").ok_or_else(|| Error::invalid_query("q", "field required"))?;
    Ok(SearchQuery {
        q: q.to_string(),
        layers: layers(pairs),
    })
}

/// All requested layers, in request order, blanks dropped.
pub fn layers(pairs: &QueryPairs) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == LAYERS || k == LAYERS_BRACKET)
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn last_value<'a>(pairs: &'a QueryPairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_layers_accepts_all_list_forms() {
        let p = pairs(&[
            ("layers", "data"),
            ("layers[]", "streaming"),
            ("layers", "backend-apis, platform-tooling"),
            ("layers", ""),
            ("other", "ignored"),
        ]);
        assert_eq!(
            layers(&p),
            vec!["data", "streaming", "backend-apis", "platform-tooling"]
        );
    }

    #[test]
    fn test_timeline_query_full() {
        let p = pairs(&[
            ("layers", "data"),
            ("start_date", "2015-01-01"),
            ("end_date", "2019-12-31"),
            ("limit", "10"),
        ]);
        let q = timeline_query(&p).unwrap();
        assert_eq!(q.layers, vec!["data"]);
        assert_eq!(q.start_date.as_deref(), Some("2015-01-01"));
        assert_eq!(q.end_date.as_deref(), Some("2019-12-31"));
        assert_eq!(q.limit, Some(10));
    }

    #[test]
    fn test_timeline_query_empty() {
        assert_eq!(timeline_query(&[]).unwrap(), TimelineQuery::default());
    }

    #[test]
    fn test_non_integer_limit_rejected() {
        for raw in ["ten", "1.5", ""] {
            match timeline_query(&pairs(&[("limit", raw)])) {
                Err(Error::InvalidQuery { param, .. }) => assert_eq!(param, "limit"),
                other => panic!("Expected InvalidQuery for '{}', got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_negative_limit_passes_parsing() {
        // Range validation belongs to the query engine.
        let q = timeline_query(&pairs(&[("limit", "-3")])).unwrap();
        assert_eq!(q.limit, Some(-3));
    }

    #[test]
    fn test_search_query_requires_q() {
        match search_query(&pairs(&[("layers", "data")])) {
            Err(Error::InvalidQuery { param, .. }) => assert_eq!(param, "q"),
            other => panic!("Expected InvalidQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_search_query_last_q_wins() {
        let q = search_query(&pairs(&[("q", "first"), ("q", "second")])).unwrap();
        assert_eq!(q.q, "second");
    }
}
