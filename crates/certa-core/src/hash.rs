//! Deterministic hashing utilities for certa.
//!
//! All digests are lowercase, fixed-width hex strings. The Merkle collaborator
//! never hashes directly; it goes through the injectable [`Hasher`] and
//! [`Noncer`] seams so callers can swap the digest or blinding scheme.
//!
//! Supported algorithms:
//! - sha256
//! - blake3 (feature `blake3`)

use sha2::{Digest, Sha256};

use crate::errors::{CertError, CertResult};
use crate::path::{join_path, Key};

/// Hash algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlg {
    #[default]
    Sha256,
    #[cfg(feature = "blake3")]
    Blake3,
}

impl HashAlg {
    pub fn parse(s: &str) -> CertResult<Self> {
        match s {
            "sha256" => Ok(HashAlg::Sha256),
            #[cfg(feature = "blake3")]
            "blake3" => Ok(HashAlg::Blake3),
            _ => Err(CertError::invalid_argument(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlg::Sha256 => "sha256",
            #[cfg(feature = "blake3")]
            HashAlg::Blake3 => "blake3",
        }
    }
}

/// Hash raw bytes using the selected algorithm.
pub fn hash_bytes(alg: HashAlg, bytes: &[u8]) -> Vec<u8> {
    match alg {
        HashAlg::Sha256 => {
            let mut h = Sha256::new();
            h.update(bytes);
            h.finalize().to_vec()
        }
        #[cfg(feature = "blake3")]
        HashAlg::Blake3 => blake3::hash(bytes).as_bytes().to_vec(),
    }
}

/// Hash raw bytes and return lowercase hex.
pub fn hash_hex(alg: HashAlg, bytes: &[u8]) -> String {
    hex::encode(hash_bytes(alg, bytes))
}

/// Turns a string payload into a hex digest.
pub trait Hasher: Send + Sync {
    fn hash(&self, payload: &str) -> String;
}

/// Derives the blinding nonce mixed into a leaf at `path`.
pub trait Noncer: Send + Sync {
    fn nonce(&self, path: &[Key]) -> String;
}

impl<F> Hasher for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn hash(&self, payload: &str) -> String {
        self(payload)
    }
}

impl<F> Noncer for F
where
    F: Fn(&[Key]) -> String + Send + Sync,
{
    fn nonce(&self, path: &[Key]) -> String {
        self(path)
    }
}

/// Hasher backed by one of the built-in digest algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestHasher {
    pub alg: HashAlg,
}

impl DigestHasher {
    pub fn new(alg: HashAlg) -> Self {
        Self { alg }
    }
}

impl Hasher for DigestHasher {
    fn hash(&self, payload: &str) -> String {
        hash_hex(self.alg, payload.as_bytes())
    }
}

/// Default noncer: the digest of the dot-joined path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathNoncer {
    pub alg: HashAlg,
}

impl PathNoncer {
    pub fn new(alg: HashAlg) -> Self {
        Self { alg }
    }
}

impl Noncer for PathNoncer {
    fn nonce(&self, path: &[Key]) -> String {
        hash_hex(self.alg, join_path(path).as_bytes())
    }
}
