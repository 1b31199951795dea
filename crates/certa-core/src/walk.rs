//! Schema walking.
//!
//! Enumerates every leaf a schema declares against a data object, producing a
//! flat, canonically ordered list of [`Prop`]s. Missing or mistyped data never
//! fails the walk: absent values become undefined leaves and non-list data
//! under an array node walks as an empty array.

use serde_json::Value;

use crate::path::{child_path, join_path, parent_path, PropPath};
use crate::schema::SchemaNode;

/// One value slot in the flattened document.
///
/// Leaves come from the walker; the composer adds one synthetic prop per
/// object/array instance whose value is that subtree's root hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub path: PropPath,
    /// `None` is undefined (absent), distinct from a JSON `null`.
    pub value: Option<Value>,
    /// Dot-joined `path`.
    pub own_key: String,
    /// Path of the group this prop is a member of: the parent path, except for
    /// an empty-array placeholder, which is the sole member of its own group.
    pub group: PropPath,
    /// Dot-joined `group`.
    pub group_key: String,
}

impl Prop {
    pub fn new(path: PropPath, value: Option<Value>) -> Self {
        let group = parent_path(&path).to_vec();
        Self::in_group(path, value, group)
    }

    /// Undefined stand-in for an array with no elements.
    pub fn placeholder(path: PropPath) -> Self {
        let group = path.clone();
        Self::in_group(path, None, group)
    }

    fn in_group(path: PropPath, value: Option<Value>, group: PropPath) -> Self {
        Self {
            own_key: join_path(&path),
            group_key: join_path(&group),
            path,
            value,
            group,
        }
    }

    /// Whether this prop belongs to a group. Only the document root does not.
    pub fn has_parent(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Walk `data` against `schema`, returning its leaves in canonical order.
pub fn walk(data: &Value, schema: &SchemaNode) -> Vec<Prop> {
    let mut out = Vec::new();
    walk_into(Some(data), schema, PropPath::new(), &mut out);
    tracing::trace!(leaves = out.len(), "schema walk finished");
    out
}

fn walk_into(data: Option<&Value>, node: &SchemaNode, prefix: PropPath, out: &mut Vec<Prop>) {
    match node {
        SchemaNode::Array { item } => {
            let items: &[Value] = match data {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            };
            let before = out.len();
            for (i, v) in items.iter().enumerate() {
                walk_into(Some(v), item, child_path(&prefix, i), out);
            }
            // An empty array still gets a group of its own.
            if out.len() == before && !prefix.is_empty() {
                out.push(Prop::placeholder(prefix));
            }
        }
        SchemaNode::Object { properties } => {
            let obj = data.and_then(Value::as_object);
            for (name, sub) in properties {
                let v = obj.and_then(|o| o.get(name));
                walk_into(v, sub, child_path(&prefix, name.as_str()), out);
            }
        }
        SchemaNode::Leaf => out.push(Prop::new(prefix, data.cloned())),
    }
}
