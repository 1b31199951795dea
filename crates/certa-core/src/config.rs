//! Configuration structures for certa-core.
//!
//! The core crate itself does not read environment variables. All configuration
//! must be provided explicitly by the caller so that evidence stays reproducible.

use crate::errors::{CertError, CertResult};
use crate::evidence::EVIDENCE_SCHEMA_URI;
use crate::hash::HashAlg;

/// Global configuration container.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub hashing: HashingConfig,
    pub limits: LimitsConfig,
    /// `$schema` written into every evidence document.
    pub evidence_uri: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            hashing: HashingConfig::default(),
            limits: LimitsConfig::default(),
            evidence_uri: EVIDENCE_SCHEMA_URI.to_string(),
        }
    }
}

/// Hashing-related configuration.
#[derive(Debug, Clone, Default)]
pub struct HashingConfig {
    /// Digest used for leaves, nodes, nonces and the schema fingerprint.
    pub algorithm: HashAlg,
}

/// Resource limits.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Deepest schema nesting accepted when building the schema tree.
    pub max_schema_depth: usize,
    /// Largest JSON document accepted by the parse helpers.
    pub max_json_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: 64,
            max_json_bytes: crate::parse::DEFAULT_MAX_JSON_BYTES,
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> CertResult<()> {
    if cfg.limits.max_schema_depth == 0 {
        return Err(CertError::invalid_argument(
            "max_schema_depth must be greater than zero",
        ));
    }

    if cfg.limits.max_json_bytes == 0 {
        return Err(CertError::invalid_argument(
            "max_json_bytes must be greater than zero",
        ));
    }

    if cfg.evidence_uri.trim().is_empty() {
        return Err(CertError::invalid_argument("evidence uri must not be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CoreConfig::default();
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn zero_depth_detected() {
        let mut cfg = CoreConfig::default();
        cfg.limits.max_schema_depth = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn empty_uri_detected() {
        let mut cfg = CoreConfig::default();
        cfg.evidence_uri = " ".to_string();
        assert!(validate_config(&cfg).is_err());
    }
}
