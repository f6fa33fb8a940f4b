use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_onboard"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "onboard init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".onboard.toml");
    assert!(config_path.exists(), ".onboard.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[llm]"));
    assert!(content.contains("[scan]"));

    // the commented template must still parse to the defaults
    let config: onboard_core::OnboardConfig = toml::from_str(&content).unwrap();
    assert!(config.llm.provider.is_none());
    assert!(config.scan.exclude.is_empty());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".onboard.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_onboard"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let existing = std::fs::read_to_string(dir.path().join(".onboard.toml")).unwrap();
    assert_eq!(existing, "# existing");
}
