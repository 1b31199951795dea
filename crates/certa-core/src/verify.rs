//! Evidence verification.
//!
//! The verifier never trusts a claimed result. It re-walks the data it was
//! handed, checks every defined leaf against the evidence, then recomputes the
//! document imprint bottom-up from the (possibly pruned) recipes.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{CertError, CertResult};
use crate::evidence::{EvidenceGroup, GroupNode, GroupValue};
use crate::merkle::{display_path, Merkle};
use crate::order::sort_deepest_first;
use crate::path::{child_path, join_path, parent_path};
use crate::schema::SchemaNode;
use crate::walk::walk;

/// Imprint of a document with no groups at all.
pub fn empty_imprint(merkle: &Merkle) -> String {
    merkle.hash("")
}

/// Check that every defined leaf of `data` agrees with the evidence.
///
/// A leaf whose parent group is missing fails. A leaf whose slot is absent from
/// its group was not disclosed and is skipped. Undefined leaves always pass.
pub fn check_inclusion(
    data: &Value,
    groups: &[EvidenceGroup],
    schema: &SchemaNode,
) -> CertResult<bool> {
    let mut index: BTreeMap<String, &EvidenceGroup> = BTreeMap::new();
    for g in groups {
        index.entry(g.key()).or_insert(g);
    }

    for leaf in walk(data, schema) {
        let Some(value) = &leaf.value else {
            continue;
        };

        let Some(group) = index.get(&leaf.group_key) else {
            tracing::debug!(leaf = %leaf.own_key, "no evidence group for leaf");
            return Ok(false);
        };

        let ordinal = schema.index_of(&leaf.path)?;
        match group.value_at(ordinal) {
            None => continue,
            Some(entry) if entry.value.as_ref() == Some(value) => continue,
            Some(_) => {
                tracing::debug!(leaf = %leaf.own_key, "leaf value differs from evidence");
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// Recompute the document imprint from evidence groups.
///
/// Groups are processed deepest-first. Each group's recomputed root is pushed
/// to the front of its own nodes and to the front of its parent's values, so
/// it shadows whatever the evidence claimed for that slot. A group whose
/// recipe cannot be imprinted contributes an empty hash instead of aborting.
///
/// Structurally impossible evidence is an error: a group at a leaf path, a
/// non-root group that discloses no value, or a non-root group whose parent
/// group is missing.
pub fn reimprint(
    groups: &[EvidenceGroup],
    schema: &SchemaNode,
    merkle: &Merkle,
) -> CertResult<String> {
    if groups.is_empty() {
        return Ok(empty_imprint(merkle));
    }

    let mut index: BTreeMap<String, EvidenceGroup> = BTreeMap::new();
    for g in groups {
        index.entry(g.key()).or_insert_with(|| g.clone());
    }
    for group in index.values() {
        check_shape(group, schema)?;
    }

    let mut order: Vec<String> = index.keys().cloned().collect();
    sort_deepest_first(&mut order, |k| k.as_str());

    for key in order {
        let Some(group) = index.get_mut(&key) else {
            continue;
        };

        let imprint = merkle
            .imprint(&group.values, &group.nodes)
            .unwrap_or_else(|e| {
                tracing::warn!(group = %display_path(&group.path), error = %e, "group imprint failed");
                String::new()
            });
        group.nodes.insert(
            0,
            GroupNode {
                index: 0,
                hash: imprint.clone(),
            },
        );

        if group.path.is_empty() {
            continue;
        }
        let path = group.path.clone();
        let parent = parent_path(&path);
        let ordinal = schema.index_of(&path)?;

        let parent_group = index.get_mut(&join_path(parent)).ok_or_else(|| {
            CertError::merkle(format!(
                "evidence group {} has no parent group",
                display_path(&path)
            ))
        })?;
        parent_group.values.insert(
            0,
            GroupValue {
                index: ordinal,
                value: Some(Value::String(imprint)),
                nonce: merkle.nonce(&child_path(parent, ordinal)),
            },
        );
    }

    let root = index
        .get("")
        .and_then(|g| g.node_at(0))
        .map(|n| n.hash.clone());

    match root {
        None => Ok(empty_imprint(merkle)),
        Some(h) if h.is_empty() => Err(CertError::merkle("root group could not be imprinted")),
        Some(h) => Ok(h),
    }
}

fn check_shape(group: &EvidenceGroup, schema: &SchemaNode) -> CertResult<()> {
    if schema.node_at(&group.path)?.is_leaf() {
        return Err(CertError::merkle(format!(
            "evidence group {} sits at a leaf path",
            display_path(&group.path)
        )));
    }
    if !group.path.is_empty() && group.values.is_empty() {
        return Err(CertError::merkle(format!(
            "evidence group {} discloses no value",
            display_path(&group.path)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::prop_path;
    use crate::recipe::build_groups;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn schema() -> SchemaNode {
        SchemaNode::from_value(
            &json!({
                "type": "object",
                "properties": {
                    "books": {
                        "type": "array",
                        "items": {"type": "object", "properties": {"title": {}, "note": {}}}
                    },
                    "name": {"type": "string"}
                }
            }),
            16,
        )
        .unwrap()
    }

    fn data() -> Value {
        json!({"books": [{"note": "A0", "title": "B0"}, {"note": "A1", "title": "B1"}], "name": "B"})
    }

    fn root_of(m: &Merkle) -> String {
        let props = compose(walk(&data(), &schema()), m).unwrap();
        match &props.iter().find(|p| p.path.is_empty()).unwrap().value {
            Some(Value::String(s)) => s.clone(),
            other => panic!("unexpected root value {other:?}"),
        }
    }

    #[test]
    fn full_evidence_reimprints_to_root() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let groups = build_groups(&props, &m, None).unwrap();
        assert!(check_inclusion(&data(), &groups, &schema()).unwrap());
        assert_eq!(reimprint(&groups, &schema(), &m).unwrap(), root_of(&m));
    }

    #[test]
    fn partial_evidence_reimprints_to_root() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let targets = [prop_path!["books", 1, "title"]];
        let groups = build_groups(&props, &m, Some(&targets[..])).unwrap();
        let public = json!({"books": [{}, {"title": "B1"}]});
        assert!(check_inclusion(&public, &groups, &schema()).unwrap());
        assert_eq!(reimprint(&groups, &schema(), &m).unwrap(), root_of(&m));
    }

    #[test]
    fn undisclosed_leaf_without_group_fails() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let targets = [prop_path!["books", 1, "title"]];
        let groups = build_groups(&props, &m, Some(&targets[..])).unwrap();
        let public = json!({"books": [{"title": "B0"}, {"title": "B1"}]});
        assert!(!check_inclusion(&public, &groups, &schema()).unwrap());
    }

    #[test]
    fn mismatched_value_fails() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let groups = build_groups(&props, &m, None).unwrap();
        let tampered = json!({"name": "C"});
        assert!(!check_inclusion(&tampered, &groups, &schema()).unwrap());
    }

    #[test]
    fn empty_groups_give_empty_imprint() {
        let m = Merkle::default();
        assert_eq!(reimprint(&[], &schema(), &m).unwrap(), m.hash(""));
    }

    #[test]
    fn broken_subgroup_changes_root_without_failing() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let mut groups = build_groups(&props, &m, None).unwrap();
        let g = groups.iter_mut().find(|g| g.key() == "books.0").unwrap();
        g.nodes.clear();
        let got = reimprint(&groups, &schema(), &m).unwrap();
        assert_ne!(got, root_of(&m));
    }

    fn full_groups(m: &Merkle) -> Vec<EvidenceGroup> {
        let props = compose(walk(&data(), &schema()), m).unwrap();
        build_groups(&props, m, None).unwrap()
    }

    #[test]
    fn orphaned_group_is_rejected() {
        let m = Merkle::default();
        let mut groups = full_groups(&m);
        groups.retain(|g| g.key() != "books");
        let g = groups.iter_mut().find(|g| g.key() == "books.1").unwrap();
        g.values.iter_mut().find(|v| v.index == 1).unwrap().value = Some(json!("FORGED"));

        let forged = json!({"books": [{}, {"title": "FORGED"}]});
        assert!(check_inclusion(&forged, &groups, &schema()).unwrap());
        assert_matches!(reimprint(&groups, &schema(), &m), Err(CertError::Merkle(_)));
    }

    #[test]
    fn group_at_leaf_path_is_rejected() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let targets = [prop_path!["name"]];
        let mut groups = build_groups(&props, &m, Some(&targets[..])).unwrap();
        groups[0].values.insert(
            0,
            GroupValue {
                index: 1,
                value: Some(json!("Mallory")),
                nonce: m.nonce(&prop_path![1]),
            },
        );
        groups.push(EvidenceGroup {
            path: prop_path!["name"],
            values: vec![],
            nodes: vec![GroupNode {
                index: 0,
                hash: "B".to_string(),
            }],
        });

        assert!(check_inclusion(&json!({"name": "Mallory"}), &groups, &schema()).unwrap());
        assert_matches!(reimprint(&groups, &schema(), &m), Err(CertError::Merkle(_)));
    }

    #[test]
    fn inner_group_without_values_is_rejected() {
        let m = Merkle::default();
        let mut groups = full_groups(&m);
        let g = groups.iter_mut().find(|g| g.key() == "books.0").unwrap();
        g.values.clear();
        g.nodes = vec![GroupNode {
            index: 0,
            hash: "anything".to_string(),
        }];
        assert!(reimprint(&groups, &schema(), &m).is_err());
    }

    #[test]
    fn huge_indexes_are_errors() {
        let m = Merkle::default();
        let mut groups = full_groups(&m);
        groups[0].values[0].index = usize::MAX;
        assert!(reimprint(&groups, &schema(), &m).is_err());

        let mut groups = full_groups(&m);
        groups[0].nodes.push(GroupNode {
            index: usize::MAX,
            hash: "x".to_string(),
        });
        assert!(reimprint(&groups, &schema(), &m).is_err());
    }

    #[test]
    fn evidence_paths_outside_schema_are_errors() {
        let m = Merkle::default();
        let props = compose(walk(&data(), &schema()), &m).unwrap();
        let mut groups = build_groups(&props, &m, None).unwrap();
        groups[1].path = prop_path!["nope"];
        assert!(reimprint(&groups, &schema(), &m).is_err());
    }
}
