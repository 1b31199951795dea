//! Parsing helpers for certa inputs.
//!
//! Core avoids filesystem/network I/O. Helpers here operate on in-memory
//! bytes and JSON values:
//! - strict JSON parsing with size limits
//! - artifact detection (schema vs evidence)
//! - evidence decoding with useful error messages for CLI consumers

use serde_json::Value;

use crate::errors::{CertError, CertResult};
use crate::evidence::Evidence;

/// Default maximum JSON bytes accepted by helpers (2 MiB).
pub const DEFAULT_MAX_JSON_BYTES: usize = 2 * 1024 * 1024;

/// Input classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Schema,
    Evidence,
    Unknown,
}

/// Parse JSON bytes into `serde_json::Value` with a hard size limit.
pub fn parse_json_bytes(bytes: &[u8], max_bytes: usize) -> CertResult<Value> {
    if bytes.len() > max_bytes {
        return Err(CertError::invalid_argument(format!(
            "JSON payload too large ({} bytes > limit {})",
            bytes.len(),
            max_bytes
        )));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| CertError::serialization(format!("failed to parse JSON: {e}")))
}

/// Detect what a parsed document is.
///
/// - evidence: has `$schema` plus a `data` (or `groups`) array
/// - schema: has `type`, `properties` or `items`
pub fn detect_kind(v: &Value) -> ArtifactKind {
    let Some(obj) = v.as_object() else {
        return ArtifactKind::Unknown;
    };

    let has_groups = ["data", "groups"]
        .iter()
        .any(|k| obj.get(*k).map(Value::is_array).unwrap_or(false));
    if obj.contains_key("$schema") && has_groups {
        return ArtifactKind::Evidence;
    }

    if ["type", "properties", "items"].iter().any(|k| obj.contains_key(*k)) {
        return ArtifactKind::Schema;
    }

    ArtifactKind::Unknown
}

/// Decode an evidence document from JSON.
pub fn evidence_from_value(v: Value) -> CertResult<Evidence> {
    if detect_kind(&v) != ArtifactKind::Evidence {
        return Err(CertError::invalid_argument("input is not an evidence document"));
    }
    serde_json::from_value(v)
        .map_err(|e| CertError::serialization(format!("failed to decode evidence: {e}")))
}

/// Parse bytes into an [`Evidence`].
pub fn parse_evidence(bytes: &[u8], max_bytes: usize) -> CertResult<Evidence> {
    evidence_from_value(parse_json_bytes(bytes, max_bytes)?)
}
