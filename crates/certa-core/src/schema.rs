//! Schema tree built from a JSON schema.
//!
//! Only the structural shape matters here: objects with `properties`, arrays
//! with `items`, and everything else as a leaf. Validation keywords such as
//! `required` are carried in the raw value (they feed `identify`) but never
//! consulted while walking.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{CertError, CertResult};
use crate::path::{join_path, Key, PropPath};

/// Structural schema node.
///
/// Object properties live in a `BTreeMap`, so iteration is always in ascending
/// lexicographic order of the declared names regardless of how the schema
/// document ordered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Object { properties: BTreeMap<String, SchemaNode> },
    Array { item: Box<SchemaNode> },
    Leaf,
}

impl SchemaNode {
    /// Build a node tree from a JSON schema value, rejecting nesting deeper
    /// than `max_depth`.
    pub fn from_value(v: &Value, max_depth: usize) -> CertResult<Self> {
        build(v, 0, max_depth)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, SchemaNode::Leaf)
    }

    /// Ordinal of each segment of `path` within its schema parent.
    ///
    /// Array segments map to the literal index. Object segments map to the rank
    /// of the name among the sorted property names.
    pub fn indexes_of(&self, path: &[Key]) -> CertResult<Vec<usize>> {
        let mut out = Vec::with_capacity(path.len());
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            let (index, next) = node.child(key).ok_or_else(|| {
                CertError::invalid_argument(format!(
                    "path {} does not match the schema at segment {depth}",
                    join_path(path)
                ))
            })?;
            out.push(index);
            node = next;
        }
        Ok(out)
    }

    /// Ordinal of the last segment of `path` within its parent.
    ///
    /// The root has no parent; its ordinal is reported as 0.
    pub fn index_of(&self, path: &[Key]) -> CertResult<usize> {
        Ok(self.indexes_of(path)?.last().copied().unwrap_or(0))
    }

    /// The schema node describing `path`.
    pub fn node_at(&self, path: &[Key]) -> CertResult<&SchemaNode> {
        path.iter().enumerate().try_fold(self, |node, (depth, key)| {
            node.child(key).map(|(_, next)| next).ok_or_else(|| {
                CertError::invalid_argument(format!(
                    "path {} does not match the schema at segment {depth}",
                    join_path(path)
                ))
            })
        })
    }

    /// Resolve a dot-separated path (`books.1.title`) against this schema.
    ///
    /// Numeric segments become array indexes only beneath array nodes, so a
    /// field literally named `"0"` stays a name.
    pub fn resolve_dotted(&self, dotted: &str) -> CertResult<PropPath> {
        let mut out = PropPath::new();
        if dotted.is_empty() {
            return Ok(out);
        }
        let mut node = self;
        for seg in dotted.split('.') {
            let key = match node {
                SchemaNode::Array { .. } => Key::Index(seg.parse::<usize>().map_err(|_| {
                    CertError::invalid_argument(format!(
                        "segment {seg:?} of {dotted:?} must be an array index"
                    ))
                })?),
                _ => Key::Name(seg.to_string()),
            };
            let (_, next) = node.child(&key).ok_or_else(|| {
                CertError::invalid_argument(format!(
                    "segment {seg:?} of {dotted:?} is not declared by the schema"
                ))
            })?;
            out.push(key);
            node = next;
        }
        Ok(out)
    }

    fn child(&self, key: &Key) -> Option<(usize, &SchemaNode)> {
        match (self, key) {
            (SchemaNode::Array { item }, Key::Index(i)) => Some((*i, item.as_ref())),
            (SchemaNode::Array { item }, Key::Name(n)) => {
                n.parse::<usize>().ok().map(|i| (i, item.as_ref()))
            }
            (SchemaNode::Object { properties }, Key::Name(n)) => properties
                .iter()
                .position(|(name, _)| name == n)
                .map(|rank| (rank, &properties[n])),
            (SchemaNode::Object { properties }, Key::Index(i)) => {
                let n = i.to_string();
                properties
                    .iter()
                    .position(|(name, _)| *name == n)
                    .map(|rank| (rank, &properties[&n]))
            }
            (SchemaNode::Leaf, _) => None,
        }
    }
}

/// A schema: the structural tree plus the document it was built from.
#[derive(Debug, Clone)]
pub struct Schema {
    root: SchemaNode,
    raw: Value,
}

impl Schema {
    pub fn from_value(raw: Value, max_depth: usize) -> CertResult<Self> {
        let root = SchemaNode::from_value(&raw, max_depth)?;
        Ok(Self { root, raw })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[derive(Clone, Copy)]
enum Shape {
    Object,
    Array,
    Leaf,
}

fn shape_of(obj: &serde_json::Map<String, Value>) -> Shape {
    let from_name = |t: &str| match t {
        "object" => Some(Shape::Object),
        "array" => Some(Shape::Array),
        _ => None,
    };

    match obj.get("type") {
        Some(Value::String(t)) => from_name(t).unwrap_or(Shape::Leaf),
        Some(Value::Array(ts)) => ts
            .iter()
            .filter_map(Value::as_str)
            .find_map(from_name)
            .unwrap_or(Shape::Leaf),
        Some(_) => Shape::Leaf,
        None if obj.contains_key("properties") => Shape::Object,
        None if obj.contains_key("items") => Shape::Array,
        None => Shape::Leaf,
    }
}

fn build(v: &Value, depth: usize, max_depth: usize) -> CertResult<SchemaNode> {
    if depth > max_depth {
        return Err(CertError::schema(format!(
            "schema nesting exceeds max depth {max_depth}"
        )));
    }

    let obj = match v.as_object() {
        Some(o) => o,
        // `true`, `{}`-like shorthands and other non-object schemas hold plain values.
        None => return Ok(SchemaNode::Leaf),
    };

    match shape_of(obj) {
        Shape::Leaf => Ok(SchemaNode::Leaf),
        Shape::Object => {
            let mut properties = BTreeMap::new();
            match obj.get("properties") {
                None => {}
                Some(Value::Object(props)) => {
                    for (name, sub) in props {
                        properties.insert(name.clone(), build(sub, depth + 1, max_depth)?);
                    }
                }
                Some(_) => {
                    return Err(CertError::schema("`properties` must be an object"));
                }
            }
            Ok(SchemaNode::Object { properties })
        }
        Shape::Array => {
            let item = match obj.get("items") {
                None => SchemaNode::Leaf,
                Some(Value::Array(_)) => {
                    return Err(CertError::schema(
                        "tuple-style `items` arrays are not supported",
                    ));
                }
                Some(sub) => build(sub, depth + 1, max_depth)?,
            };
            Ok(SchemaNode::Array {
                item: Box::new(item),
            })
        }
    }
}
