//! certa-core
//!
//! Tamper-evident evidence for structured data:
//! - schema walking into a flat, canonically ordered leaf table
//! - bottom-up composition of one Merkle tree per object/array instance
//! - full and selectively disclosed evidence documents
//! - verification that recomputes the document imprint from partial evidence
//!
//! The entry point is [`Cert`].

pub mod canonical;
pub mod cert;
pub mod compose;
pub mod config;
pub mod errors;
pub mod evidence;
pub mod expose;
pub mod hash;
pub mod merkle;
pub mod order;
pub mod parse;
pub mod path;
pub mod recipe;
pub mod schema;
pub mod verify;
pub mod walk;

pub use crate::cert::Cert;
pub use crate::errors::{CertError, CertResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::cert::Cert;
    pub use crate::config::{CoreConfig, HashingConfig, LimitsConfig};
    pub use crate::evidence::{Evidence, EvidenceGroup, GroupNode, GroupValue, EVIDENCE_SCHEMA_URI};
    pub use crate::hash::{DigestHasher, HashAlg, Hasher, Noncer, PathNoncer};
    pub use crate::merkle::{Merkle, Recipe};
    pub use crate::path::{join_path, Key, PropPath};
    pub use crate::prop_path;
    pub use crate::schema::{Schema, SchemaNode};
    pub use crate::{CertError, CertResult};
}
