//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp dir so the user
//! config is never touched.

use std::path::Path;
use std::process::Command;

const BANK: &str = r#"
[[modules]]
id = "alpha"
title = "Alpha"

[[modules.questions]]
prompt = "First?"
options = ["yes", "no"]
correct_answer = "yes"

[[modules.questions]]
prompt = "Second?"
options = ["yes", "no"]
correct_answer = "no"

[[modules]]
id = "beta"
title = "Beta"

[[modules.questions]]
prompt = "Third?"
options = ["up", "down"]
correct_answer = "up"
"#;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_examsim"))
        .args(args)
        .env("HOME", home)
        .env_remove("EXAMSIM_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_grade_prints_tier() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["grade", "67"]);
    assert_eq!(code, 0);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["grade"]["tier"], "practitioner");
    assert_eq!(json["grade"]["is_passing"], true);
    assert_eq!(json["is_certificate_eligible"], false);
}

#[test]
fn test_grade_rejects_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["grade", "101"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_modules_lists_sample_bank() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["modules", "--json"]);
    assert_eq!(code, 0);

    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["assessment", "development", "strategies"]);
}

#[test]
fn test_replay_script_produces_final_report() {
    let home = tempfile::tempdir().unwrap();
    let bank = write(home.path(), "bank.toml", BANK);
    let script = write(
        home.path(),
        "script.json",
        r#"[
            {"intent": "start_module", "module_id": "alpha"},
            {"intent": "select_option", "option": "yes"},
            {"intent": "skip_feedback"},
            {"intent": "select_option", "option": "no"},
            {"intent": "skip_feedback"},
            {"intent": "go_to_next_module"},
            {"intent": "tick", "ticks": 20},
            {"intent": "view_certificate"}
        ]"#,
    );

    let (stdout, stderr, code) = run_cli(
        home.path(),
        &[
            "replay",
            &script,
            "--bank",
            &bank,
            "--question-ticks",
            "5",
            "--feedback-ticks",
            "2",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["rejected"].as_array().unwrap().len(), 0);
    assert_eq!(json["snapshot"]["screen"], "certificate");
    assert_eq!(json["report"]["total_correct"], 2);
    assert_eq!(json["report"]["total_questions"], 3);
    assert_eq!(json["report"]["is_complete"], true);
    assert_eq!(json["report"]["grade"]["percentage"], 67);
}

#[test]
fn test_replay_collects_rejected_intents() {
    let home = tempfile::tempdir().unwrap();
    let script = write(
        home.path(),
        "script.json",
        r#"[{"intent": "skip_feedback"}, {"intent": "view_certificate"}]"#,
    );

    let (stdout, _, code) = run_cli(home.path(), &["replay", &script]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["rejected"].as_array().unwrap().len(), 2);
    assert_eq!(json["snapshot"]["screen"], "home");
}

#[test]
fn test_replay_strict_fails_on_unknown_module() {
    let home = tempfile::tempdir().unwrap();
    let script = write(
        home.path(),
        "script.json",
        r#"[{"intent": "start_module", "module_id": "nope"}]"#,
    );

    let (_, stderr, code) = run_cli(home.path(), &["replay", &script, "--strict"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("nope"));
}

#[test]
fn test_bank_validate() {
    let home = tempfile::tempdir().unwrap();
    let good = write(home.path(), "bank.toml", BANK);
    let (stdout, _, code) = run_cli(home.path(), &["bank", "validate", &good]);
    assert_eq!(code, 0);
    assert!(stdout.contains("2 modules"));

    let bad = write(
        home.path(),
        "bad.toml",
        &BANK.replace(r#"correct_answer = "up""#, r#"correct_answer = "left""#),
    );
    let (_, stderr, code) = run_cli(home.path(), &["bank", "validate", &bad]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "timing.question_ticks", "30"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timing.question_ticks"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("examsim/config.toml"));

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "timing.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_replay_rejects_zero_length_countdowns() {
    let home = tempfile::tempdir().unwrap();
    let script = write(home.path(), "script.json", "[]");

    for flag in ["--question-ticks", "--feedback-ticks"] {
        let (stdout, stderr, code) = run_cli(home.path(), &["replay", &script, flag, "0"]);
        assert_ne!(code, 0, "{flag} 0 was accepted");
        assert!(stdout.is_empty());
        assert!(stderr.contains(flag));
    }
}

#[test]
fn test_replay_logs_rejected_steps_at_debug() {
    let home = tempfile::tempdir().unwrap();
    let script = write(
        home.path(),
        "script.json",
        r#"[{"intent": "skip_feedback"}]"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_examsim"))
        .args(["replay", &script])
        .env("HOME", home.path())
        .env_remove("EXAMSIM_ENV")
        .env("RUST_LOG", "debug")
        .output()
        .expect("Failed to execute CLI command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("replay step rejected"));
}
