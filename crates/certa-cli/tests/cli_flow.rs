//! cli_flow.rs
//!
//! Black-box tests of the `certa` binary: the producer writes evidence and a
//! projected document to disk, the consumer recomputes the imprint from them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn certa(args: &[&str]) -> Output {
    let out = Command::new(env!("CARGO_BIN_EXE_certa"))
        .args(args)
        .output()
        .expect("failed to spawn certa");
    assert!(
        out.status.success(),
        "certa {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn json_stdout(args: &[&str]) -> Value {
    let out = certa(args);
    serde_json::from_slice(&out.stdout).expect("stdout is not JSON")
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn disclose_expose_calculate() {
    let dir = tempfile::tempdir().unwrap();
    let schema = fixture("schema.json");
    let data = fixture("data.json");
    let evidence = dir.path().join("evidence.json");
    let public = dir.path().join("public.json");

    let full = json_stdout(&["--json", "imprint", "--schema", p(&schema), "--data", p(&data)]);
    assert_eq!(full["ok"], true);

    let paths = ["--path", "name", "--path", "books.1.title"];
    let mut disclose = vec!["disclose", "--schema", p(&schema), "--data", p(&data), "--out", p(&evidence)];
    disclose.extend(paths);
    certa(&disclose);
    let mut expose = vec!["expose", "--schema", p(&schema), "--data", p(&data), "--out", p(&public)];
    expose.extend(paths);
    certa(&expose);

    let exposed: Value = serde_json::from_slice(&fs::read(&public).unwrap()).unwrap();
    assert_eq!(exposed, serde_json::json!({"name": "B", "books": [null, {"title": "B1"}]}));

    let got = json_stdout(&[
        "--json",
        "calculate",
        "--schema",
        p(&schema),
        "--data",
        p(&public),
        "--evidence",
        p(&evidence),
    ]);
    assert_eq!(got["imprint"], full["imprint"]);

    let kind = json_stdout(&["inspect", p(&evidence)]);
    assert_eq!(kind["kind"], "evidence");
}

#[test]
fn calculate_reports_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let schema = fixture("schema.json");
    let data = fixture("data.json");
    let evidence = dir.path().join("evidence.json");
    certa(&["notarize", "--schema", p(&schema), "--data", p(&data), "--out", p(&evidence)]);

    let forged = dir.path().join("forged.json");
    fs::write(&forged, br#"{"name": "Mallory"}"#).unwrap();
    let got = json_stdout(&[
        "--json",
        "calculate",
        "--schema",
        p(&schema),
        "--data",
        p(&forged),
        "--evidence",
        p(&evidence),
    ]);
    assert_eq!(got["ok"], false);
    assert_eq!(got["imprint"], Value::Null);
}

#[test]
fn identify_is_stable_and_alg_dependent() {
    let schema = fixture("schema.json");
    let a = json_stdout(&["--json", "identify", "--schema", p(&schema)]);
    let b = json_stdout(&["--json", "identify", "--schema", p(&schema)]);
    assert_eq!(a, b);

    let c = json_stdout(&["--json", "--hash-alg", "blake3", "identify", "--schema", p(&schema)]);
    assert_ne!(a["id"], c["id"]);
}

#[test]
fn unknown_path_fails() {
    let out = Command::new(env!("CARGO_BIN_EXE_certa"))
        .args(["disclose", "--schema", p(&fixture("schema.json")), "--data", p(&fixture("data.json"))])
        .args(["--path", "nope"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}
