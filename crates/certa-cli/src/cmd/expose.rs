use anyhow::Result;

use super::{resolve_paths, Ctx};
use crate::args::DocArgs;
use crate::io::export;

pub fn run(ctx: &Ctx, doc: &DocArgs, dotted: &[String], out: Option<&str>) -> Result<()> {
    let (cert, data) = ctx.load(doc)?;
    let paths = resolve_paths(&cert, dotted)?;
    export::emit(out, &cert.expose(&data, &paths))
}
