//! Ordering rules that digests depend on.
//!
//! Two orders matter:
//! - groups are folded deepest-first: by decreasing length of the dot-joined
//!   path string, ties broken by descending string comparison. A child group's
//!   key is always longer than its parent's, so children finish first.
//! - members of one group are ordered by their typed path: array indexes
//!   numerically, object names lexicographically.
//!
//! Both are spelled out here so they stay visible and auditable.

use std::cmp::Ordering;

use crate::path::Key;

/// Deepest-first comparison of dot-joined group keys.
pub fn cmp_deepest_first(a: &str, b: &str) -> Ordering {
    b.len().cmp(&a.len()).then_with(|| b.cmp(a))
}

/// Sort items deepest-first by the group key `key_fn` extracts.
pub fn sort_deepest_first<T, F>(items: &mut [T], key_fn: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| cmp_deepest_first(key_fn(a), key_fn(b)));
}

/// Canonical member order for paths that share a parent.
pub fn cmp_members(a: &[Key], b: &[Key]) -> Ordering {
    a.cmp(b)
}
