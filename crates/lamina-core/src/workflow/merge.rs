//! Draft merge semantics for step collected_data and photo URLs.
//!
//! Merges are deep: when the existing and incoming value for a key are
//! both JSON objects, they merge recursively; any other pairing lets the
//! incoming value overwrite. This is what makes incremental checklist
//! saves lossless (`{checklist: {a}}` then `{checklist: {b}}` keeps both).
//! Arrays and scalars overwrite wholesale.

use serde_json::{Map, Value};

/// Merge `incoming` into `existing` in place, deep for nested objects.
pub fn merge_collected_data(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, incoming_value) in incoming {
        match (existing.get_mut(&key), incoming_value) {
            (Some(Value::Object(current)), Value::Object(new)) => {
                merge_collected_data(current, new);
            }
            (_, new_value) => {
                existing.insert(key, new_value);
            }
        }
    }
}

/// Union photo URLs in first-seen order: append new, skip duplicates.
pub fn union_photo_urls(existing: &mut Vec<String>, incoming: &[String]) {
    for url in incoming {
        if !existing.iter().any(|u| u == url) {
            existing.push(url.clone());
        }
    }
}
