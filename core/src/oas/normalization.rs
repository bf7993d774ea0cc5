#![deny(missing_docs)]

//! # Output Normalization
//!
//! Post-processing applied to assembled documents before they leave the crate.

use serde_json::Value;

/// Replaces every `null` leaf with an empty string, recursively.
///
/// Older Swagger renderers reject `null` anywhere in a document, so nothing
/// produced by this crate carries one. Keys are never removed: a `null`
/// setting copied into a schema becomes `""`.
pub fn scrub_nulls(value: &mut Value) {
    match value {
        Value::Null => *value = Value::String(String::new()),
        Value::Object(map) => {
            for v in map.values_mut() {
                scrub_nulls(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                scrub_nulls(v);
            }
        }
        _ => {}
    }
}
