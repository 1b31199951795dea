use anyhow::{Context, Result};
use serde_json::Value;

use certa_core::config::CoreConfig;
use certa_core::hash::HashAlg;
use certa_core::path::PropPath;
use certa_core::Cert;

use crate::args::{Cli, Command, DocArgs};
use crate::io::input;

mod evidence;
mod expose;
mod identify;
mod inspect;
mod verify;

pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = Ctx::from_cli(&cli)?;
    match cli.command {
        Command::Identify { schema, raw } => identify::run(&ctx, &schema, raw),
        Command::Notarize { doc, out } => evidence::run(&ctx, &doc, None, out.as_deref()),
        Command::Disclose { doc, paths, out } => evidence::run(&ctx, &doc, Some(paths.as_slice()), out.as_deref()),
        Command::Expose { doc, paths, out } => expose::run(&ctx, &doc, &paths, out.as_deref()),
        Command::Calculate { doc, evidence } => verify::calculate(&ctx, &doc, &evidence),
        Command::Imprint { doc } => verify::imprint(&ctx, &doc),
        Command::Inspect { input } => inspect::run(&ctx, &input),
    }
}

/// Settings shared by every command.
pub struct Ctx {
    pub config: CoreConfig,
}

impl Ctx {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = CoreConfig::default();
        config.hashing.algorithm = HashAlg::parse(&cli.hash_alg)?;
        config.limits.max_json_bytes = cli.max_json_bytes;
        Ok(Self { config })
    }

    pub fn read_json(&self, path: &str) -> Result<Value> {
        input::read_json_file(path, self.config.limits.max_json_bytes)
    }

    pub fn cert(&self, schema_path: &str) -> Result<Cert> {
        let schema = self.read_json(schema_path)?;
        Cert::with_config(schema, self.config.clone())
            .with_context(|| format!("invalid schema {schema_path}"))
    }

    /// Load the schema and data named by `doc`.
    pub fn load(&self, doc: &DocArgs) -> Result<(Cert, Value)> {
        let cert = self.cert(&doc.schema)?;
        let data = self.read_json(&doc.data)?;
        Ok((cert, data))
    }
}

/// Resolve dotted CLI paths against the schema.
pub fn resolve_paths(cert: &Cert, dotted: &[String]) -> Result<Vec<PropPath>> {
    dotted
        .iter()
        .map(|d| {
            cert.schema()
                .root()
                .resolve_dotted(d)
                .with_context(|| format!("bad --path {d:?}"))
        })
        .collect()
}
