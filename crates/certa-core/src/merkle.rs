//! Chained Merkle recipes.
//!
//! Every group of sibling values is committed by its own small tree. For `n`
//! values at group path `P` the nodes are laid out as a chain:
//!
//! - node `2n` is the hash of the empty string (the tail),
//! - node `2i + 1` is the leaf hash `H(payload(v_i) ++ nonce(P + [i]))`,
//! - node `2i` is `H(node[2i + 1] ++ node[2i + 2])`.
//!
//! Node 0 is the root. A disclosed recipe keeps the values being revealed, the
//! leaf hashes of the hidden values in front of them, and the chain node right
//! after the last revealed value; everything else can be recomputed.
//!
//! Hashing and nonce derivation are injected through [`Hasher`] / [`Noncer`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::canonical::leaf_payload;
use crate::errors::{CertError, CertResult};
use crate::evidence::{GroupNode, GroupValue};
use crate::hash::{DigestHasher, HashAlg, Hasher, Noncer, PathNoncer};
use crate::path::{child_path, join_path, Key};

/// Values and nodes of one group's tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipe {
    pub values: Vec<GroupValue>,
    pub nodes: Vec<GroupNode>,
}

impl Recipe {
    /// Root hash (node 0), if present.
    pub fn root(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.index == 0)
            .map(|n| n.hash.as_str())
    }
}

/// The Merkle collaborator.
#[derive(Clone)]
pub struct Merkle {
    hasher: Arc<dyn Hasher>,
    noncer: Arc<dyn Noncer>,
}

impl fmt::Debug for Merkle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merkle").finish_non_exhaustive()
    }
}

impl Default for Merkle {
    fn default() -> Self {
        Self::with_alg(HashAlg::default())
    }
}

impl Merkle {
    pub fn new(hasher: impl Hasher + 'static, noncer: impl Noncer + 'static) -> Self {
        Self {
            hasher: Arc::new(hasher),
            noncer: Arc::new(noncer),
        }
    }

    /// Built-in digest for hashing, digest of the joined path for nonces.
    pub fn with_alg(alg: HashAlg) -> Self {
        Self::new(DigestHasher::new(alg), PathNoncer::new(alg))
    }

    pub fn hash(&self, payload: &str) -> String {
        self.hasher.hash(payload)
    }

    pub fn nonce(&self, path: &[Key]) -> String {
        self.noncer.nonce(path)
    }

    fn leaf_hash(&self, value: Option<&Value>, nonce: &str) -> String {
        let mut payload = leaf_payload(value);
        payload.push_str(nonce);
        self.hasher.hash(&payload)
    }

    fn node_hash(&self, left: &str, right: &str) -> String {
        let mut payload = String::with_capacity(left.len() + right.len());
        payload.push_str(left);
        payload.push_str(right);
        self.hasher.hash(&payload)
    }

    /// Build the full recipe over `values`, nonced per position under `path`.
    pub fn notarize(&self, values: &[Option<Value>], path: &[Key]) -> Recipe {
        let n = values.len();
        let mut hashes = vec![String::new(); 2 * n + 1];
        let mut out_values = Vec::with_capacity(n);

        let mut chain = self.hasher.hash("");
        hashes[2 * n] = chain.clone();

        for (i, value) in values.iter().enumerate().rev() {
            let nonce = self.noncer.nonce(&child_path(path, i));
            let leaf = self.leaf_hash(value.as_ref(), &nonce);
            chain = self.node_hash(&leaf, &chain);
            hashes[2 * i + 1] = leaf;
            hashes[2 * i] = chain.clone();
            out_values.push(GroupValue {
                index: i,
                value: value.clone(),
                nonce,
            });
        }
        out_values.reverse();

        Recipe {
            values: out_values,
            nodes: hashes
                .into_iter()
                .enumerate()
                .map(|(index, hash)| GroupNode { index, hash })
                .collect(),
        }
    }

    /// Prune `recipe` down to what is needed to prove the values at `positions`.
    pub fn disclose(&self, recipe: &Recipe, positions: &[usize]) -> CertResult<Recipe> {
        let size = recipe.values.len();
        let exposed: BTreeSet<usize> = positions.iter().copied().collect();
        if let Some(&bad) = exposed.iter().find(|&&p| p >= size) {
            return Err(CertError::merkle(format!(
                "cannot disclose position {bad} of a {size}-value recipe"
            )));
        }

        let node = |index: usize| -> CertResult<GroupNode> {
            recipe
                .nodes
                .iter()
                .find(|n| n.index == index)
                .cloned()
                .ok_or_else(|| CertError::merkle(format!("recipe is missing node {index}")))
        };

        let Some(&last) = exposed.iter().next_back() else {
            return Ok(Recipe {
                values: Vec::new(),
                nodes: vec![node(0)?],
            });
        };

        let values = recipe
            .values
            .iter()
            .filter(|v| exposed.contains(&v.index))
            .cloned()
            .collect();

        let mut nodes = Vec::new();
        for i in (0..=last).filter(|i| !exposed.contains(i)) {
            nodes.push(node(2 * i + 1)?);
        }
        nodes.push(node(2 * (last + 1))?);

        Ok(Recipe { values, nodes })
    }

    /// Recompute the root of a (possibly pruned) recipe.
    ///
    /// Duplicate indexes are allowed; the first entry wins. Every position
    /// below the highest one must be covered by a value or an odd node, so the
    /// chain is never longer than the recipe has entries.
    pub fn imprint(&self, values: &[GroupValue], nodes: &[GroupNode]) -> CertResult<String> {
        let overflow = || CertError::merkle("recipe index out of range");
        let top = values
            .iter()
            .map(|v| v.index.checked_add(1).ok_or_else(overflow))
            .chain(
                nodes
                    .iter()
                    .filter(|n| n.index % 2 == 1)
                    .map(|n| Ok((n.index - 1) / 2 + 1)),
            )
            .try_fold(0usize, |top, i| i.map(|i| top.max(i)))?;

        if top == 0 {
            return node_hash_at(nodes, 0).map(str::to_string);
        }
        if top > values.len() + nodes.len() {
            return Err(overflow());
        }

        let tail = top.checked_mul(2).ok_or_else(overflow)?;
        let mut chain = node_hash_at(nodes, tail)?.to_string();
        for i in (0..top).rev() {
            let leaf = match values.iter().find(|v| v.index == i) {
                Some(v) => self.leaf_hash(v.value.as_ref(), &v.nonce),
                None => node_hash_at(nodes, 2 * i + 1)?.to_string(),
            };
            chain = self.node_hash(&leaf, &chain);
        }

        tracing::trace!(size = top, "recipe imprinted");
        Ok(chain)
    }
}

fn node_hash_at(nodes: &[GroupNode], index: usize) -> CertResult<&str> {
    let n = nodes
        .iter()
        .find(|n| n.index == index)
        .ok_or_else(|| CertError::merkle(format!("recipe is missing node {index}")))?;
    if n.hash.is_empty() {
        return Err(CertError::merkle(format!("node {index} has an empty hash")));
    }
    Ok(&n.hash)
}

/// Render a group path for log fields.
pub(crate) fn display_path(path: &[Key]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        join_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop_path;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn values() -> Vec<Option<Value>> {
        vec![Some(json!("A")), None, Some(json!(3)), Some(json!({"k": true}))]
    }

    #[test]
    fn notarize_lays_out_chain() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &prop_path!["x"]);
        assert_eq!(r.values.len(), 4);
        assert_eq!(r.nodes.len(), 9);
        assert_eq!(r.nodes[8].hash, m.hash(""));
        let expected = m.node_hash(&r.nodes[7].hash, &r.nodes[8].hash);
        assert_eq!(r.nodes[6].hash, expected);
        assert_eq!(r.values[2].nonce, m.nonce(&prop_path!["x", 2]));
    }

    #[test]
    fn imprint_of_full_recipe_is_root() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        let root = m.imprint(&r.values, &r.nodes).unwrap();
        assert_eq!(Some(root.as_str()), r.root());
    }

    #[test]
    fn disclosed_subsets_keep_the_root() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &prop_path!["g"]);
        let root = r.root().unwrap().to_string();

        for positions in [vec![0], vec![1], vec![3], vec![0, 2], vec![1, 3], vec![0, 1, 2, 3]] {
            let d = m.disclose(&r, &positions).unwrap();
            assert_eq!(d.values.len(), positions.len());
            assert_eq!(m.imprint(&d.values, &d.nodes).unwrap(), root, "{positions:?}");
        }
    }

    #[test]
    fn disclose_prunes_to_minimum() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        let d = m.disclose(&r, &[1]).unwrap();
        let idx: Vec<usize> = d.nodes.iter().map(|n| n.index).collect();
        assert_eq!(idx, vec![1, 4]);
    }

    #[test]
    fn disclose_nothing_keeps_root_only() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        let d = m.disclose(&r, &[]).unwrap();
        assert!(d.values.is_empty());
        assert_eq!(d.root(), r.root());
        assert_eq!(m.imprint(&d.values, &d.nodes).unwrap(), r.root().unwrap());
    }

    #[test]
    fn disclose_rejects_out_of_range() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        assert_matches!(m.disclose(&r, &[4]), Err(CertError::Merkle(_)));
    }

    #[test]
    fn imprint_rejects_huge_indexes() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);

        let mut v = r.values.clone();
        v[0].index = usize::MAX;
        assert_matches!(m.imprint(&v, &r.nodes), Err(CertError::Merkle(_)));

        let mut n = r.nodes.clone();
        n.push(GroupNode {
            index: usize::MAX,
            hash: "x".to_string(),
        });
        assert_matches!(m.imprint(&r.values, &n), Err(CertError::Merkle(_)));

        let sparse = [GroupValue {
            index: 1_000_000,
            value: Some(json!("A")),
            nonce: "n".to_string(),
        }];
        assert_matches!(m.imprint(&sparse, &r.nodes), Err(CertError::Merkle(_)));
    }

    #[test]
    fn imprint_rejects_missing_nodes() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        let mut d = m.disclose(&r, &[2]).unwrap();
        d.nodes.retain(|n| n.index != 6);
        assert_matches!(m.imprint(&d.values, &d.nodes), Err(CertError::Merkle(_)));
        assert_matches!(m.imprint(&[], &[]), Err(CertError::Merkle(_)));
    }

    #[test]
    fn tampered_value_changes_root() {
        let m = Merkle::default();
        let r = m.notarize(&values(), &[]);
        let mut d = m.disclose(&r, &[0]).unwrap();
        d.values[0].value = Some(json!("Z"));
        assert_ne!(m.imprint(&d.values, &d.nodes).unwrap(), r.root().unwrap());
    }

    #[test]
    fn empty_recipe_root_is_tail() {
        let m = Merkle::default();
        let r = m.notarize(&[], &[]);
        assert_eq!(r.root(), Some(m.hash("").as_str()));
    }

    #[test]
    fn injected_functions_are_used() {
        let m = Merkle::new(|s: &str| format!("h({s})"), |p: &[Key]| join_path(p));
        let r = m.notarize(&[Some(json!("v"))], &prop_path!["a"]);
        assert_eq!(r.root(), Some("h(h(va.0)h())"));
    }
}
