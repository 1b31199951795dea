//! Group composition.
//!
//! Folds the flat leaf list bottom-up so that every object/array instance gets
//! one synthetic [`Prop`] whose value is the Merkle root over its members. A
//! member is either a raw leaf or a child instance's synthetic prop, so groups
//! must be folded only after all of their children.
//!
//! With the `parallel` feature, groups of equal depth are folded concurrently
//! and depths are processed deepest first. Output is identical either way.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{CertError, CertResult};
use crate::merkle::{display_path, Merkle};
use crate::order::{cmp_members, sort_deepest_first};
use crate::path::{join_path, prefixes, Key, PropPath};
use crate::walk::Prop;

/// Member positions (into the prop list) keyed by group key.
pub(crate) type MemberIndex = BTreeMap<String, Vec<usize>>;

/// Every group on the way from the root to any prop's group, keyed by group
/// key. Instances holding only other instances are included.
pub(crate) fn group_paths(props: &[Prop]) -> BTreeMap<String, PropPath> {
    let mut groups = BTreeMap::new();
    groups.insert(String::new(), PropPath::new());
    for p in props.iter().filter(|p| p.has_parent()) {
        for pre in prefixes(&p.group) {
            groups
                .entry(join_path(pre))
                .or_insert_with(|| pre.to_vec());
        }
    }
    groups
}

pub(crate) fn member_index(props: &[Prop]) -> MemberIndex {
    let mut members = MemberIndex::new();
    for (i, p) in props.iter().enumerate().filter(|(_, p)| p.has_parent()) {
        members.entry(p.group_key.clone()).or_default().push(i);
    }
    members
}

/// Values of a group's members in canonical member order.
pub(crate) fn member_values(props: &[Prop], members: Option<&Vec<usize>>) -> Vec<Option<Value>> {
    let mut idx = members.cloned().unwrap_or_default();
    idx.sort_by(|&a, &b| cmp_members(&props[a].path, &props[b].path));
    idx.into_iter().map(|i| props[i].value.clone()).collect()
}

/// Append one synthetic prop per object/array instance and return every prop
/// in canonical path order.
pub fn compose(mut props: Vec<Prop>, merkle: &Merkle) -> CertResult<Vec<Prop>> {
    let mut members = member_index(&props);
    let mut groups: Vec<(String, PropPath)> = group_paths(&props).into_iter().collect();
    sort_deepest_first(&mut groups, |(k, _)| k.as_str());

    tracing::debug!(
        leaves = props.len(),
        groups = groups.len(),
        "composing groups"
    );

    fold_all(&mut props, &mut members, groups, merkle)?;

    props.sort_by(|a, b| cmp_members(&a.path, &b.path));
    Ok(props)
}

#[cfg(not(feature = "parallel"))]
fn fold_all(
    props: &mut Vec<Prop>,
    members: &mut MemberIndex,
    groups: Vec<(String, PropPath)>,
    merkle: &Merkle,
) -> CertResult<()> {
    for (key, path) in groups {
        let folded = fold_group(props, members.get(&key), &path, merkle)?;
        attach(props, members, folded);
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn fold_all(
    props: &mut Vec<Prop>,
    members: &mut MemberIndex,
    groups: Vec<(String, PropPath)>,
    merkle: &Merkle,
) -> CertResult<()> {
    use rayon::prelude::*;

    let mut levels: BTreeMap<usize, Vec<(String, PropPath)>> = BTreeMap::new();
    for (key, path) in groups {
        levels.entry(path.len()).or_default().push((key, path));
    }

    for (_, batch) in levels.into_iter().rev() {
        let snapshot: &[Prop] = props;
        let index: &MemberIndex = members;
        let folded = batch
            .par_iter()
            .map(|(key, path)| fold_group(snapshot, index.get(key), path, merkle))
            .collect::<CertResult<Vec<Prop>>>()?;
        for p in folded {
            attach(props, members, p);
        }
    }
    Ok(())
}

fn fold_group(
    props: &[Prop],
    members: Option<&Vec<usize>>,
    path: &[Key],
    merkle: &Merkle,
) -> CertResult<Prop> {
    let values = member_values(props, members);
    let recipe = merkle.notarize(&values, path);
    let root = recipe.root().ok_or_else(|| {
        CertError::invariant(format!("group {} produced no root", display_path(path)))
    })?;
    tracing::trace!(group = %display_path(path), members = values.len(), "group folded");
    Ok(Prop::new(path.to_vec(), Some(Value::String(root.to_string()))))
}

fn attach(props: &mut Vec<Prop>, members: &mut MemberIndex, prop: Prop) {
    if prop.has_parent() {
        members
            .entry(prop.group_key.clone())
            .or_default()
            .push(props.len());
    }
    props.push(prop);
}
