use anyhow::Result;

use super::Ctx;
use crate::args::DocArgs;
use crate::io::input;
use crate::output;

pub fn calculate(ctx: &Ctx, doc: &DocArgs, evidence_path: &str) -> Result<()> {
    let (cert, data) = ctx.load(doc)?;
    let evidence = input::read_evidence_file(evidence_path, ctx.config.limits.max_json_bytes)?;
    if evidence.schema_uri != ctx.config.evidence_uri {
        tracing::warn!(uri = %evidence.schema_uri, "unexpected evidence $schema");
    }
    let imprint = cert.calculate(&data, &evidence);
    output::print_hash("imprint", imprint.as_deref())
}

pub fn imprint(ctx: &Ctx, doc: &DocArgs) -> Result<()> {
    let (cert, data) = ctx.load(doc)?;
    output::print_hash("imprint", cert.imprint(&data).as_deref())
}
