use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` as pretty JSON to `out`, creating parent directories.
pub fn write_json<P: AsRef<Path>, T: Serialize>(out: P, value: &T) -> Result<()> {
    let out = out.as_ref();
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::debug!(path = %out.display(), "output written");
    Ok(())
}

/// Write to `out` when given, else print to stdout.
pub fn emit<T: Serialize>(out: Option<&str>, value: &T) -> Result<()> {
    match out {
        Some(p) => write_json(p, value),
        None => crate::output::print(value),
    }
}
