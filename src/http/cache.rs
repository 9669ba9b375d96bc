//! `ETag` validators for static assets.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` derived from the asset content, e.g. `"1f3a9c"`
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Whether `If-None-Match` lets us answer 304 for `etag`
///
/// Accepts a comma separated list, weak validators (`W/"..."`) and `*`.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}
