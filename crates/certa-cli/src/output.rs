use std::io::Write;
use std::sync::OnceLock;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub fn init(json: bool) {
    let _ = JSON_MODE.set(json);
}

pub fn is_json() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

/// Documents (evidence, exposed data) are always printed as JSON.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct HashOut<'a> {
    ok: bool,
    #[serde(flatten)]
    field: std::collections::BTreeMap<&'a str, Option<&'a str>>,
}

/// Print a single labelled hash. `None` means the input did not verify.
pub fn print_hash(label: &str, hash: Option<&str>) -> anyhow::Result<()> {
    if is_json() {
        let field = [(label, hash)].into_iter().collect();
        return print(&HashOut {
            ok: hash.is_some(),
            field,
        });
    }

    let mut out = stdout();
    match hash {
        Some(h) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{label}")?;
            out.reset()?;
            writeln!(out, ": {h}")?;
        }
        None => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            writeln!(out, "{label}: not verified")?;
            out.reset()?;
        }
    }
    Ok(())
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
