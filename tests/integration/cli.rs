//! Integration tests for the urllink binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
list_id = "0f6b7c4e-5a2d-4c1b-9e3f-2a7d8c6b5e41"

[columns]
DocLink = "https://docs.contoso.com/view?id={DocID}"
"#;

fn urllink(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("urllink").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn project(config: &str, rows: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("urllink.toml"), config).unwrap();
    fs::write(temp.path().join("rows.jsonl"), rows).unwrap();
    temp
}

#[test]
fn test_render_html() {
    let temp = project(CONFIG, "{\"Title\": \"Spec\", \"DocID\": \"A-17\"}\n{\"DocID\": \"B\"}\n");

    urllink(temp.path())
        .args(["render", "--column", "DocLink", "rows.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<div><a target=\"_blank\" href=\""))
        .stdout(predicate::str::contains("id=A-17\">Spec</a></div>"))
        .stderr(predicate::str::contains("No Title specified"));
}

#[test]
fn test_render_json_with_target_override() {
    let temp = project(CONFIG, "{\"Title\": \"Spec\", \"DocID\": \"A-17\"}\n{not json\n");

    let output = urllink(temp.path())
        .args(["--quiet", "render", "--column", "DocLink", "--target", "_self", "--format", "json"])
        .arg("rows.jsonl")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let rows: Vec<serde_json::Value> =
        stdout.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["status"], "rendered");
    assert_eq!(rows[0]["link"]["href"], "https://docs.contoso.com/view?id=A-17");
    assert_eq!(rows[0]["link"]["target"], "_self");
    assert_eq!(rows[1]["status"], "suppressed");
    assert!(rows[1]["reason"].as_str().unwrap().contains("not valid JSON"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_render_warns_on_malformed_row() {
    let temp = project(CONFIG, "{not json\n{\"Title\": \"Spec\", \"DocID\": \"A-17\"}\n");

    urllink(temp.path())
        .args(["render", "--column", "DocLink", "rows.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains(">Spec</a></div>"))
        .stderr(predicate::str::contains("not valid JSON"))
        .stderr(predicate::str::contains("({not json)"));
}

#[test]
fn test_render_from_stdin_with_explicit_config() {
    let temp = project("", "");
    let config = temp.path().join("team.toml");
    fs::write(&config, CONFIG).unwrap();

    urllink(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["render", "--column", "DocLink"])
        .write_stdin("{\"Title\": \"From stdin\", \"DocID\": \"9\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(">From stdin</a>"));
}

#[test]
fn test_render_unknown_column_suppresses_rows() {
    let temp = project(CONFIG, "{\"Title\": \"Spec\"}\n");

    urllink(temp.path())
        .args(["render", "--column", "Missing", "rows.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("href").not())
        .stderr(predicate::str::contains("Failed to fetch template for column 'Missing'"));
}

#[test]
fn test_render_invalid_config() {
    let temp = project("list_id = [", "");

    urllink(temp.path())
        .args(["render", "--column", "DocLink", "rows.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[test]
fn test_substitute() {
    let temp = TempDir::new().unwrap();

    urllink(temp.path())
        .args(["substitute", "--template", "http://x/{a}/{c}", "--payload", r#"{"a": "1"}"#])
        .assert()
        .success()
        .stdout("http://x/1/{c}\n");
}

#[test]
fn test_substitute_invalid_payload() {
    let temp = TempDir::new().unwrap();

    urllink(temp.path())
        .args(["substitute", "--template", "http://x/{a}", "--payload", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row value is not valid JSON"));
}
