//! Content fingerprints used as entity tags.
//!
//! A result is fingerprinted as the MD5 of the compact JSON
//! `{"id":..,"value":..,"user":..}`; a collection as the MD5 of the JSON
//! array of those tuples, in the order they are returned.

use serde::Serialize;

use super::ResultRecord;

#[derive(Serialize)]
struct Fingerprint {
    id: i32,
    value: i32,
    user: i32,
}

impl From<&ResultRecord> for Fingerprint {
    fn from(result: &ResultRecord) -> Self {
        Self {
            id: result.id,
            value: result.value,
            user: result.user_id,
        }
    }
}

pub fn resource_etag(result: &ResultRecord) -> String {
    digest(&Fingerprint::from(result))
}

pub fn collection_etag(results: &[ResultRecord]) -> String {
    let tuples: Vec<Fingerprint> = results.iter().map(Fingerprint::from).collect();
    digest(&tuples)
}

fn digest<T: Serialize + ?Sized>(value: &T) -> String {
    // Integer-only structs always serialize.
    let canonical = serde_json::to_vec(value).unwrap_or_default();
    format!("{:x}", md5::compute(canonical))
}

/// Strips an optional weak marker and surrounding quotes from an entity tag.
fn normalize(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}

/// True when `If-None-Match` lists `etag`, or `*` if `allow_wildcard`.
pub fn none_match_hits(header: Option<&str>, etag: &str, allow_wildcard: bool) -> bool {
    let Some(header) = header else {
        return false;
    };

    header
        .split(',')
        .map(normalize)
        .filter(|tag| !tag.is_empty())
        .any(|tag| tag == etag || (allow_wildcard && tag == "*"))
}

/// True only when `If-Match` is present and equals `etag`.
pub fn if_match_holds(header: Option<&str>, etag: &str) -> bool {
    header.map(normalize).is_some_and(|tag| tag == etag)
}
