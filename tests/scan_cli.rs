use std::fs;
use std::process::{Command, Output};

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/core")).unwrap();
    fs::write(
        root.join("package.json"),
        r#"{"name": "cli-fixture", "scripts": {"build": "tsc"}}"#,
    )
    .unwrap();
    fs::write(
        root.join("src/index.ts"),
        "import { run } from './core/run';\nrun();\n",
    )
    .unwrap();
    fs::write(
        root.join("src/core/run.ts"),
        "export function run() {}\n",
    )
    .unwrap();
    dir
}

fn onboard(dir: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_onboard"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("LLM_PROVIDER")
        .output()
        .unwrap()
}

#[test]
fn scan_json_reports_files_and_modules() {
    let dir = workspace();
    let output = onboard(&dir, &["scan", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["manifest"]["name"], "cli-fixture");
    assert_eq!(json["files"].as_array().unwrap().len(), 2);
    assert_eq!(json["modules"][0]["name"], "core");
    assert_eq!(json["languages"], serde_json::json!(["ts", "json"]));
    assert_eq!(json["entrypoints"].as_array().unwrap().len(), 1);
}

#[test]
fn scan_text_lists_modules() {
    let dir = workspace();
    let output = onboard(&dir, &["scan"]);
    assert!(output.status.success());

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("core"), "{text}");
    assert!(text.contains("./core/run"), "{text}");
}

#[test]
fn scan_honors_config_exclusions() {
    let dir = workspace();
    fs::write(dir.path().join("custom.toml"), "[scan]\nexclude = [\"core\"]\n").unwrap();

    let output = onboard(&dir, &["scan", "--format", "json", "--config", "custom.toml"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files"].as_array().unwrap().len(), 1);
    assert!(json["modules"][0]["files"].as_array().unwrap().is_empty());
}

#[test]
fn scan_missing_path_prints_empty_summary() {
    let dir = workspace();
    let output = onboard(&dir, &["scan", "--path", "does-not-exist", "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["files"].as_array().unwrap().is_empty());
}

#[test]
fn ai_scan_without_key_prints_fallback() {
    let dir = workspace();
    let output = onboard(&dir, &["ai-scan", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["provider"], "fallback");
    assert!(json["summary"].as_str().unwrap().contains("Modules: core"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = workspace();
    fs::write(dir.path().join(".onboard.toml"), "{{not toml").unwrap();
    let output = onboard(&dir, &["scan"]);
    assert!(!output.status.success());
}
