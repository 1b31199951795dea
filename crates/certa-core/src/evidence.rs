//! Evidence wire model.
//!
//! An evidence document is plain JSON: one record per schema-internal node
//! instance, each holding that node's local Merkle recipe (possibly pruned).
//!
//! ```json
//! {
//!   "$schema": "https://conventions.0xcert.org/xcert-evidence.json",
//!   "data": [
//!     {"path": ["books", 1], "values": [{"index": 1, "value": "B1", "nonce": "…"}],
//!      "nodes": [{"index": 1, "hash": "…"}, {"index": 4, "hash": "…"}]}
//!   ]
//! }
//! ```
//!
//! A value entry without a `value` field stands for an undefined leaf; `null`
//! is a defined JSON null.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::path::{join_path, PropPath};

/// `$schema` URI identifying the evidence document type.
pub const EVIDENCE_SCHEMA_URI: &str = "https://conventions.0xcert.org/xcert-evidence.json";

/// A complete or partial evidence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "$schema")]
    pub schema_uri: String,
    #[serde(rename = "data", alias = "groups", default)]
    pub groups: Vec<EvidenceGroup>,
}

impl Evidence {
    pub fn new(schema_uri: impl Into<String>, groups: Vec<EvidenceGroup>) -> Self {
        Self {
            schema_uri: schema_uri.into(),
            groups,
        }
    }

    /// The group at `path`, if present.
    pub fn group(&self, path: &[crate::path::Key]) -> Option<&EvidenceGroup> {
        self.groups.iter().find(|g| g.path == path)
    }
}

/// One independent Merkle tree: the proof for a single object/array instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceGroup {
    pub path: PropPath,
    #[serde(default)]
    pub values: Vec<GroupValue>,
    #[serde(default)]
    pub nodes: Vec<GroupNode>,
}

impl EvidenceGroup {
    /// Dot-joined path; the grouping key shared with the walker.
    pub fn key(&self) -> String {
        join_path(&self.path)
    }

    /// First value entry at `index`. Earlier entries shadow later duplicates.
    pub fn value_at(&self, index: usize) -> Option<&GroupValue> {
        self.values.iter().find(|v| v.index == index)
    }

    /// First node entry at `index`.
    pub fn node_at(&self, index: usize) -> Option<&GroupNode> {
        self.nodes.iter().find(|n| n.index == index)
    }
}

/// A disclosed member value with its ordinal and blinding nonce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupValue {
    pub index: usize,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub value: Option<Value>,
    #[serde(default)]
    pub nonce: String,
}

/// A tree node hash at a chain position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupNode {
    pub index: usize,
    pub hash: String,
}

// A present `value` key is always `Some`, even when it holds `null`; only an
// absent key is undefined.
fn present_value<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}
