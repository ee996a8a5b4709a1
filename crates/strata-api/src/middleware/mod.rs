//! Response middleware shared by the handlers.

pub mod cache_headers;

pub use cache_headers::{cached_json, entity_tag, is_not_modified, CachePolicy};
