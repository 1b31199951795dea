//! Structural paths into a data object.
//!
//! A path is an ordered list of keys: object field names or array indexes. The
//! empty path denotes the document root. Paths are rendered with `.` between
//! segments; this rendering is what group and member keys are compared on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One path segment.
///
/// On the wire a key is either a JSON string (object field) or a non-negative
/// JSON integer (array index).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Name(String),
}

/// Ordered sequence of keys. Empty means the document root.
pub type PropPath = Vec<Key>;

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(n) => f.write_str(n),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

/// Build a [`PropPath`] from mixed literals: `prop_path!["books", 1, "title"]`.
#[macro_export]
macro_rules! prop_path {
    () => {
        ::std::vec::Vec::<$crate::path::Key>::new()
    };
    ($($k:expr),+ $(,)?) => {
        vec![$($crate::path::Key::from($k)),+]
    };
}

/// Dot-join a path. The root renders as the empty string.
pub fn join_path(path: &[Key]) -> String {
    let mut out = String::new();
    for (i, k) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&k.to_string());
    }
    out
}

/// The parent of `path`. The root is its own parent.
pub fn parent_path(path: &[Key]) -> &[Key] {
    match path.split_last() {
        Some((_, parent)) => parent,
        None => path,
    }
}

/// Every prefix of `path` from the root up to and including `path` itself.
pub fn prefixes(path: &[Key]) -> impl Iterator<Item = &[Key]> {
    (0..=path.len()).map(move |n| &path[..n])
}

/// Append `key` to a copy of `path`.
pub fn child_path(path: &[Key], key: impl Into<Key>) -> PropPath {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(key.into());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_mixed_keys() {
        let p = prop_path!["books", 1, "title"];
        assert_eq!(join_path(&p), "books.1.title");
        assert_eq!(join_path(&[]), "");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert!(parent_path(&[]).is_empty());
        let p = prop_path!["event", "organizer"];
        assert_eq!(parent_path(&p), &prop_path!["event"][..]);
    }

    #[test]
    fn prefixes_include_root_and_self() {
        let p = prop_path!["a", 0];
        let all: Vec<String> = prefixes(&p).map(join_path).collect();
        assert_eq!(all, vec!["", "a", "a.0"]);
    }

    #[test]
    fn keys_decode_untagged() {
        let p: PropPath = serde_json::from_str(r#"["books",1]"#).unwrap();
        assert_eq!(p, prop_path!["books", 1]);
    }
}
