use anyhow::Result;
use serde::Serialize;

use certa_core::parse::{detect_kind, ArtifactKind};

use super::Ctx;
use crate::output;

#[derive(Debug, Serialize)]
pub struct InspectOut {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<usize>,
}

pub fn run(ctx: &Ctx, input: &str) -> Result<()> {
    let v = ctx.read_json(input)?;
    let out = match detect_kind(&v) {
        ArtifactKind::Schema => InspectOut {
            kind: "schema",
            groups: None,
        },
        ArtifactKind::Evidence => {
            let ev = certa_core::parse::evidence_from_value(v)?;
            InspectOut {
                kind: "evidence",
                groups: Some(ev.groups.len()),
            }
        }
        ArtifactKind::Unknown => InspectOut {
            kind: "unknown",
            groups: None,
        },
    };
    output::print(&out)
}
