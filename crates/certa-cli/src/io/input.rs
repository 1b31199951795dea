use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use certa_core::evidence::Evidence;
use certa_core::parse::{evidence_from_value, parse_json_bytes};

pub fn read_json_file<P: AsRef<Path>>(path: P, max_bytes: usize) -> Result<Value> {
    let path = path.as_ref();
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let v = parse_json_bytes(&raw, max_bytes).with_context(|| format!("in {}", path.display()))?;
    Ok(v)
}

pub fn read_evidence_file<P: AsRef<Path>>(path: P, max_bytes: usize) -> Result<Evidence> {
    let path = path.as_ref();
    let v = read_json_file(path, max_bytes)?;
    let ev = evidence_from_value(v).with_context(|| format!("in {}", path.display()))?;
    Ok(ev)
}
