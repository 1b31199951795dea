use anyhow::Result;

use super::{resolve_paths, Ctx};
use crate::args::DocArgs;
use crate::io::export;

/// `notarize` when `paths` is `None`, `disclose` otherwise.
pub fn run(ctx: &Ctx, doc: &DocArgs, paths: Option<&[String]>, out: Option<&str>) -> Result<()> {
    let (cert, data) = ctx.load(doc)?;
    let evidence = match paths {
        None => cert.notarize(&data)?,
        Some(dotted) => {
            let paths = resolve_paths(&cert, dotted)?;
            cert.disclose(&data, &paths)?
        }
    };
    tracing::info!(groups = evidence.groups.len(), "evidence produced");
    export::emit(out, &evidence)
}
