//! Error types for certa-core.
//!
//! Producer-side operations (`notarize`, `disclose`, schema construction) return
//! these errors to the caller. The verifier boundary (`calculate`, `imprint`)
//! collapses every error into a `None` result.

use thiserror::Error;

/// Result alias used across the crate.
pub type CertResult<T> = Result<T, CertError>;

/// Errors produced by certa-core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertError {
    /// Caller supplied an argument that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The JSON schema could not be turned into a schema tree.
    #[error("schema error: {0}")]
    Schema(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The Merkle collaborator rejected a recipe.
    #[error("merkle error: {0}")]
    Merkle(String),

    /// An internal ordering or structural invariant was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl CertError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn merkle(msg: impl Into<String>) -> Self {
        Self::Merkle(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let e = CertError::merkle("missing node 4");
        assert_eq!(e.to_string(), "merkle error: missing node 4");
    }
}
