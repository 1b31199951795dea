//! The public certification facade.
//!
//! A [`Cert`] binds a schema to a Merkle collaborator and exposes the producer
//! side (`notarize`, `disclose`, `expose`) and the consumer side (`calculate`,
//! `imprint`) of evidence handling.
//!
//! Producer errors propagate. The consumer boundary answers with a hash or
//! `None` and never says why.

use serde_json::Value;

use crate::canonical::normalize_schema;
use crate::compose::compose;
use crate::config::{validate_config, CoreConfig};
use crate::errors::{CertError, CertResult};
use crate::evidence::Evidence;
use crate::merkle::Merkle;
use crate::path::{join_path, PropPath};
use crate::recipe::build_groups;
use crate::schema::{Schema, SchemaNode};
use crate::verify::{check_inclusion, empty_imprint, reimprint};
use crate::walk::{walk, Prop};

/// Schema-bound evidence producer and verifier.
#[derive(Debug, Clone)]
pub struct Cert {
    schema: Schema,
    merkle: Merkle,
    config: CoreConfig,
}

impl Cert {
    /// Default configuration: sha256 digests, path-derived nonces.
    pub fn new(schema: Value) -> CertResult<Self> {
        Self::with_config(schema, CoreConfig::default())
    }

    pub fn with_config(schema: Value, config: CoreConfig) -> CertResult<Self> {
        let merkle = Merkle::with_alg(config.hashing.algorithm);
        Self::with_merkle(schema, config, merkle)
    }

    /// Use a caller-built Merkle collaborator (custom hasher / noncer).
    pub fn with_merkle(schema: Value, config: CoreConfig, merkle: Merkle) -> CertResult<Self> {
        validate_config(&config)?;
        let schema = Schema::from_value(schema, config.limits.max_schema_depth)?;
        if schema.root().is_leaf() {
            return Err(CertError::schema(
                "root schema must describe an object or an array",
            ));
        }
        Ok(Self {
            schema,
            merkle,
            config,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn merkle(&self) -> &Merkle {
        &self.merkle
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn root(&self) -> &SchemaNode {
        self.schema.root()
    }

    /// Fingerprint of the schema document itself.
    ///
    /// With `normalize`, object keys and scalar arrays are deep-sorted first so
    /// that declaration order does not matter.
    pub fn identify(&self, normalize: bool) -> CertResult<String> {
        let doc = if normalize {
            normalize_schema(self.schema.raw())
        } else {
            self.schema.raw().clone()
        };
        let text = serde_json::to_string(&doc)
            .map_err(|e| CertError::serialization(format!("failed to encode schema: {e}")))?;
        Ok(self.merkle.hash(&text))
    }

    fn composed(&self, data: &Value) -> CertResult<Vec<Prop>> {
        compose(walk(data, self.root()), &self.merkle)
    }

    /// Full evidence: every group with its complete recipe.
    pub fn notarize(&self, data: &Value) -> CertResult<Evidence> {
        let props = self.composed(data)?;
        let groups = build_groups(&props, &self.merkle, None)?;
        Ok(Evidence::new(self.config.evidence_uri.clone(), groups))
    }

    /// Selective evidence proving only the values at `paths`.
    pub fn disclose(&self, data: &Value, paths: &[PropPath]) -> CertResult<Evidence> {
        for p in paths {
            self.root().indexes_of(p).map_err(|_| {
                CertError::invalid_argument(format!(
                    "disclosure path {} is not declared by the schema",
                    join_path(p)
                ))
            })?;
        }
        let props = self.composed(data)?;
        let groups = build_groups(&props, &self.merkle, Some(paths))?;
        Ok(Evidence::new(self.config.evidence_uri.clone(), groups))
    }

    /// Project `data` down to the values at `paths`.
    pub fn expose(&self, data: &Value, paths: &[PropPath]) -> Value {
        crate::expose::expose(data, paths)
    }

    /// Verify `data` against `evidence` and return the recomputed imprint, or
    /// `None` if anything does not line up.
    pub fn calculate(&self, data: &Value, evidence: &Evidence) -> Option<String> {
        let run = || -> CertResult<Option<String>> {
            if !check_inclusion(data, &evidence.groups, self.root())? {
                return Ok(None);
            }
            reimprint(&evidence.groups, self.root(), &self.merkle).map(Some)
        };
        match run() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "evidence rejected");
                None
            }
        }
    }

    /// Root hash committing to the whole of `data`.
    pub fn imprint(&self, data: &Value) -> Option<String> {
        let evidence = match self.notarize(data) {
            Ok(ev) => ev,
            Err(e) => {
                tracing::debug!(error = %e, "imprint failed");
                return None;
            }
        };
        evidence
            .group(&[])
            .and_then(|g| g.node_at(0))
            .map(|n| n.hash.clone())
    }

    /// Imprint of a document with no evidence groups.
    pub fn empty_imprint(&self) -> String {
        empty_imprint(&self.merkle)
    }
}
