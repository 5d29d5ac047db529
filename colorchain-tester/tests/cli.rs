use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "colorchain-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_colorchain-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("twist-trap"));
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_smoke_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_colorchain-tester");
    let output_path = temp_path("smoke");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke",
            "--iterations",
            "1",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Color Memory Chain Tester"));

    let report = std::fs::read_to_string(&output_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&report).expect("json report");
    let runs = parsed.as_array().expect("array of results");
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|run| run["passed"] == true));
    assert_eq!(runs[0]["scenario_name"], "smoke");
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_persists_profiles_to_file() {
    let exe = env!("CARGO_BIN_EXE_colorchain-tester");
    let profiles_path = temp_path("profiles");
    let output_path = temp_path("profiles-report");
    let status = Command::new(exe)
        .args([
            "--report",
            "csv",
            "--scenarios",
            "profile-checkpoints",
            "--iterations",
            "1",
            "--profiles",
        ])
        .arg(&profiles_path)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let stored = std::fs::read_to_string(&profiles_path).expect("read profiles");
    assert!(stored.contains("Simulator"));
    let csv = std::fs::read_to_string(&output_path).expect("read csv");
    assert!(csv.lines().nth(1).is_some_and(|row| row.starts_with("profile-checkpoints,1337,true")));
    let _ = std::fs::remove_file(profiles_path);
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_rejects_invalid_config() {
    let exe = env!("CARGO_BIN_EXE_colorchain-tester");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{"twist_threshold": 0}"#).expect("write config");
    let output = Command::new(exe)
        .args(["--iterations", "1", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("twist_threshold"));
    let _ = std::fs::remove_file(config_path);
}
