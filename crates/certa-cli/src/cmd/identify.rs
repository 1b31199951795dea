use anyhow::Result;

use super::Ctx;
use crate::output;

pub fn run(ctx: &Ctx, schema: &str, raw: bool) -> Result<()> {
    let cert = ctx.cert(schema)?;
    let id = cert.identify(!raw)?;
    output::print_hash("id", Some(id.as_str()))
}
