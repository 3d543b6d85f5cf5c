//! CLI smoke tests for the companion-server binary

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_companion_server(args: &[&str], home: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_companion-server"))
        .args(args)
        .env("HOME", home)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute companion-server")
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, body).expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn base_config(dir: &TempDir) -> String {
    format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 18087

logging:
  default:
    console_level: "off"
    file: ""
"#,
        dir.path().join("home").to_string_lossy().replace('\\', "/")
    )
}

#[test]
fn test_cli_help_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_companion_server(&["--help"], tmp.path());

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("companion-server") || stdout.contains("Companion"));
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_companion_server(&["--version"], tmp.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("companion-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_companion_server(&["invalid-command"], tmp.path());
    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let tmp = TempDir::new().unwrap();
    let output = run_companion_server(
        &["--config", "/nonexistent/config.yaml", "check"],
        tmp.path(),
    );

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "{}", stderr);
}

#[test]
fn test_cli_check_valid_config() {
    let tmp = TempDir::new().unwrap();
    let body = format!(
        "{}\nmodules:\n  companion:\n    daily_limit_secs: 1800\n",
        base_config(&tmp)
    );
    let cfg = write_config(&tmp, &body);

    let output = run_companion_server(&["--config", &cfg, "check"], tmp.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "check should pass: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
    assert!(tmp.path().join("home").is_dir(), "home_dir is created on load");
}

#[test]
fn test_cli_check_rejects_bad_module_config() {
    let tmp = TempDir::new().unwrap();
    let body = format!(
        "{}\nmodules:\n  companion:\n    daily_limit: 10\n",
        base_config(&tmp)
    );
    let cfg = write_config(&tmp, &body);

    let output = run_companion_server(&["--config", &cfg, "check"], tmp.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("companion"), "{}", stderr);
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(&tmp, &base_config(&tmp));

    let output = run_companion_server(
        &["--config", &cfg, "--port", "19999", "--print-config"],
        tmp.path(),
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 19999"), "{}", stdout);
}
