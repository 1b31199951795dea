//! Evidence recipe construction.
//!
//! Turns the composed prop table into one [`EvidenceGroup`] per object/array
//! instance. Without targets every group is emitted with its full recipe. With
//! targets, each group is pruned to the members lying on a target's path and
//! groups off every target path are dropped. A target naming an object or
//! array discloses its whole subtree.

use std::collections::BTreeSet;

use crate::compose::{group_paths, member_index};
use crate::errors::CertResult;
use crate::evidence::EvidenceGroup;
use crate::merkle::{display_path, Merkle};
use crate::order::cmp_members;
use crate::path::{join_path, prefixes, Key, PropPath};
use crate::walk::Prop;

/// Keys of every prefix of every target, root included.
pub fn required_keys(targets: &[PropPath]) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    keys.insert(String::new());
    for t in targets {
        keys.extend(prefixes(t).map(join_path));
    }
    keys
}

/// What a targeted build keeps: every prefix of a target, and everything at or
/// below one.
struct Disclosure<'a> {
    required: BTreeSet<String>,
    targets: &'a [PropPath],
}

impl<'a> Disclosure<'a> {
    fn new(targets: &'a [PropPath]) -> Self {
        Self {
            required: required_keys(targets),
            targets,
        }
    }

    fn covers(&self, key: &str, path: &[Key]) -> bool {
        self.required.contains(key) || self.targets.iter().any(|t| path.starts_with(t))
    }
}

/// Build evidence groups from composed props.
pub fn build_groups(
    props: &[Prop],
    merkle: &Merkle,
    targets: Option<&[PropPath]>,
) -> CertResult<Vec<EvidenceGroup>> {
    let members = member_index(props);
    let mut groups: Vec<(String, PropPath)> = group_paths(props).into_iter().collect();
    groups.sort_by(|a, b| cmp_members(&a.1, &b.1));

    let required = targets.map(Disclosure::new);

    let mut out = Vec::with_capacity(groups.len());
    for (key, path) in groups {
        if let Some(req) = &required {
            if !req.covers(&key, &path) {
                continue;
            }
        }

        let mut idx = members.get(&key).cloned().unwrap_or_default();
        idx.sort_by(|&a, &b| cmp_members(&props[a].path, &props[b].path));
        let values: Vec<_> = idx.iter().map(|&i| props[i].value.clone()).collect();
        let mut recipe = merkle.notarize(&values, &path);

        if let Some(req) = &required {
            let positions: Vec<usize> = idx
                .iter()
                .enumerate()
                .filter(|(_, i)| req.covers(&props[**i].own_key, &props[**i].path))
                .map(|(pos, _)| pos)
                .collect();
            recipe = merkle.disclose(&recipe, &positions)?;
            tracing::trace!(
                group = %display_path(&path),
                disclosed = positions.len(),
                members = values.len(),
                "group pruned"
            );
        }

        out.push(EvidenceGroup {
            path,
            values: recipe.values,
            nodes: recipe.nodes,
        });
    }

    tracing::debug!(
        groups = out.len(),
        selective = required.is_some(),
        "evidence groups built"
    );
    Ok(out)
}
