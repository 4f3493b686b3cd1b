#![allow(deprecated)]
//! Exit-code and output contract for the `arbiter` binary, run against fake models.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const ARBITER_ENV: [&str; 5] = [
    "ARBITER_CONFIG",
    "ARBITER_BIND",
    "ARBITER_DOCUMENTS",
    "ARBITER_QUESTIONS",
    "ARBITER_TIMEOUT",
];

fn arbiter() -> Command {
    let mut cmd = Command::cargo_bin("arbiter").unwrap();
    for var in ARBITER_ENV {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Fixtures plus a config with two fake respondents and one fake judge.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("memo.txt"), "The memo was signed by Grace.").unwrap();
    fs::write(
        dir.path().join("documents.json"),
        r#"[{ "doc_name": "Memo", "doc_type": "memo", "doc_path": "memo.txt" }]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("questions.json"),
        r#"[{ "doc_type": "memo", "questions": ["Who signed it?"] }]"#,
    )
    .unwrap();
    let config = dir.path().join("arbiter.yaml");
    fs::write(
        &config,
        format!(
            r#"version: 1
data:
  documents: {}
  questions: {}
models:
  - {{ id: 0, provider: fake, model: alpha, display_name: Alpha, role: respondent }}
  - {{ id: 1, provider: fake, model: beta, display_name: Beta, role: respondent }}
  - {{ id: 2, provider: fake, model: gamma, display_name: Gamma, role: judge }}
"#,
            dir.path().join("documents.json").display(),
            dir.path().join("questions.json").display()
        ),
    )
    .unwrap();
    (dir, config)
}

fn with_config(config: &Path) -> Command {
    let mut cmd = arbiter();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn version_prints_crate_version() {
    arbiter()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn models_filters_by_role() {
    let (_dir, config) = workspace();

    let out = with_config(&config)
        .args(["models", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let all: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);

    with_config(&config)
        .args(["models", "--role", "judge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gamma").and(predicate::str::contains("Alpha").not()));
}

#[test]
fn documents_lists_fixtures() {
    let (_dir, config) = workspace();
    with_config(&config)
        .arg("documents")
        .assert()
        .success()
        .stdout(predicate::str::contains("Memo"));
}

#[test]
fn ask_unknown_model_fails_with_code_1() {
    let (_dir, config) = workspace();
    with_config(&config)
        .args(["ask", "--model", "1", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beta received the prompt."));

    with_config(&config)
        .args(["ask", "--model", "9", "hello"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("model not found: 9"));
}

#[test]
fn evaluate_runs_respondents_then_judge() {
    let (_dir, config) = workspace();
    with_config(&config)
        .args(["evaluate", "--doc", "0"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("== Model 2: Beta (id 1) ==")
                .and(predicate::str::contains("Q1. Who signed it?"))
                .and(predicate::str::contains("Best model: Model 1 (Alpha)")),
        );
}

#[test]
fn evaluate_json_reports_verdict() {
    let (dir, config) = workspace();
    let notes = dir.path().join("notes.md");
    fs::write(&notes, "Notes about the memo.").unwrap();

    let out = with_config(&config)
        .args(["evaluate", "--json", "-q", "What is it about?", "--file"])
        .arg(&notes)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let body: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(body["verdict"]["judge_id"], 2);
    assert_eq!(body["verdict"]["best_model"], 1);
    assert_eq!(body["respondents"].as_array().unwrap().len(), 2);
    assert!(body["error"].is_null());
}

#[test]
fn evaluate_unknown_document_and_missing_questions_fail_with_code_1() {
    let (dir, config) = workspace();
    with_config(&config)
        .args(["evaluate", "--doc", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("document not found: 5"));

    with_config(&config)
        .args(["evaluate", "--file"])
        .arg(dir.path().join("memo.txt"))
        .assert()
        .code(1);
}

#[test]
fn bad_config_and_missing_credentials_fail_with_code_2() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "version: 9\n").unwrap();
    with_config(&bad).arg("models").assert().code(2);

    // Built-in roster; model 0 needs OPENAI_API_KEY.
    let roster = dir.path().join("roster.yaml");
    fs::write(&roster, "version: 1\n").unwrap();
    with_config(&roster)
        .env_remove("OPENAI_API_KEY")
        .args(["ask", "--model", "0", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}
