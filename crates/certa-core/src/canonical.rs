//! Canonical JSON helpers.
//!
//! `serde_json` is built with `preserve_order`, so maps keep their declared
//! key order. Anything that feeds a digest goes through this module first so
//! that logically equal documents produce identical bytes.

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::errors::{CertError, CertResult};

/// Recursively sort object keys. Array order is preserved.
pub fn sort_keys_deep(v: &Value) -> Value {
    match v {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .sorted_by(|a, b| a.0.cmp(b.0))
                .map(|(k, v)| (k.clone(), sort_keys_deep(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sort_keys_deep).collect()),
        other => other.clone(),
    }
}

/// Recursively sort object keys and the members of arrays that hold only
/// scalars (e.g. `required`, `enum`). Arrays holding objects or arrays keep
/// their order.
pub fn normalize_schema(v: &Value) -> Value {
    match v {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .sorted_by(|a, b| a.0.cmp(b.0))
                .map(|(k, v)| (k.clone(), normalize_schema(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) if items.iter().all(is_scalar) => Value::Array(
            items
                .iter()
                .sorted_by_cached_key(|x| scalar_text(x))
                .cloned()
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(normalize_schema).collect()),
        other => other.clone(),
    }
}

/// Compact canonical JSON text (keys sorted).
pub fn to_canonical_string(v: &Value) -> CertResult<String> {
    serde_json::to_string(&sort_keys_deep(v))
        .map_err(|e| CertError::serialization(format!("failed to encode canonical JSON: {e}")))
}

/// The string a leaf value contributes to its Merkle leaf hash.
///
/// Undefined renders as the empty string and strings render bare; every other
/// value renders as canonical JSON text, so `"1"` and `1` hash differently.
pub fn leaf_payload(v: Option<&Value>) -> String {
    match v {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => scalar_text(&sort_keys_deep(other)),
    }
}

fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Object(_) | Value::Array(_))
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
