//! Command-line tests running the built binary against fixture files

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};

const CONFIG: &str = r#"
[guard]
protected_site = "website"
protected_template = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"

[logging]
level = "warn"
"#;

const FIXTURE: &str = r#"
[[templates]]
id = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"
name = "Secured Base"

[[templates]]
id = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
name = "Article"
base_templates = ["{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"]

[[templates]]
id = "{6D2E8A4C-0B9F-4C1E-9A7D-3F5B1E8C2A46}"
name = "Folder"

[[items]]
id = "{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}"
name = "Q3 payroll"
template = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
scope = "/org/emea"
departments = ["finance"]
required_roles = ["payroll-reader"]

[[items]]
id = "{7B9D1F3A-5C7E-4902-A4B6-C8D0E2F41638}"
name = "Public news"
template = "{6D2E8A4C-0B9F-4C1E-9A7D-3F5B1E8C2A46}"

[[principals]]
id = "jdoe"
scopes = ["/org/emea"]
departments = ["Finance"]
roles = ["payroll-reader"]

[[principals]]
id = "intern"
scopes = ["/org/emea/interns"]
"#;

const PAYROLL: &str = "{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}";
const ARTICLE: &str = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}";
const SECURED_BASE: &str = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}";
const FOLDER: &str = "{6D2E8A4C-0B9F-4C1E-9A7D-3F5B1E8C2A46}";

struct Workspace {
    _dir: TempDir,
    config: PathBuf,
    fixture: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempdir().unwrap();
    let config = dir.path().join("content-guard.toml");
    let fixture = dir.path().join("content.toml");
    fs::write(&config, CONFIG).unwrap();
    fs::write(&fixture, FIXTURE).unwrap();
    Workspace {
        _dir: dir,
        config,
        fixture,
    }
}

fn content_guard(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_content-guard"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("CONTENT_GUARD_CONFIG")
        .env_remove("CONTENT_GUARD_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_derives_command() {
    let ws = workspace();
    let fixture = ws.fixture.to_str().unwrap();

    let output = content_guard(
        &ws.config,
        &["derives", "--fixture", fixture, "--template", ARTICLE, "--ancestor", SECURED_BASE],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "true");

    let output = content_guard(
        &ws.config,
        &["derives", "--fixture", fixture, "--template", FOLDER, "--ancestor", SECURED_BASE],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "false");
}

#[test]
fn test_check_command_reports_visibility() {
    let ws = workspace();
    let fixture = ws.fixture.to_str().unwrap();

    let report = json_stdout(&content_guard(
        &ws.config,
        &["check", "--fixture", fixture, "--item", PAYROLL, "--principal", "jdoe"],
    ));
    assert_eq!(report["item"], PAYROLL);
    assert_eq!(report["principal_resolved"], true);
    assert_eq!(report["visible"], true);
    assert_eq!(report["outcome"]["outcome"], "authorized");

    let report = json_stdout(&content_guard(
        &ws.config,
        &["check", "--fixture", fixture, "--item", PAYROLL, "--principal", "intern"],
    ));
    assert_eq!(report["visible"], false);
    assert_eq!(report["outcome"]["outcome"], "denied");
    assert_eq!(report["outcome"]["detail"]["predicate"], "scope");

    let report = json_stdout(&content_guard(
        &ws.config,
        &[
            "check",
            "--fixture",
            fixture,
            "--item",
            PAYROLL,
            "--principal",
            "intern",
            "--no-security-check",
        ],
    ));
    assert_eq!(report["visible"], true);
    assert_eq!(report["outcome"]["outcome"], "not_applicable");
}

#[test]
fn test_check_unknown_item_is_hidden_without_outcome() {
    let ws = workspace();
    let fixture = ws.fixture.to_str().unwrap();

    let report = json_stdout(&content_guard(
        &ws.config,
        &[
            "check",
            "--fixture",
            fixture,
            "--item",
            "{00000000-0000-4000-8000-000000000001}",
            "--principal",
            "jdoe",
        ],
    ));
    assert_eq!(report["visible"], false);
    assert!(report["outcome"].is_null());
}

#[test]
fn test_audit_counts_each_item_once() {
    let ws = workspace();
    let fixture = ws.fixture.to_str().unwrap();

    let report = json_stdout(&content_guard(
        &ws.config,
        &["audit", "--fixture", fixture, "--principal", "stranger"],
    ));
    assert_eq!(report["principal_resolved"], false);

    let items = report["items"].as_array().unwrap();
    let visible: Vec<_> = items
        .iter()
        .map(|i| (i["name"].as_str().unwrap(), i["visible"].as_bool().unwrap()))
        .collect();
    assert_eq!(visible, vec![("Public news", true), ("Q3 payroll", false)]);

    let metrics = &report["metrics"];
    assert_eq!(metrics["total_reads"], 2);
    assert_eq!(metrics["hidden"], 1);
    assert_eq!(metrics["not_applicable"], 1);
    assert_eq!(metrics["lookup_failures"], 1);
}

#[test]
fn test_missing_fixture_fails() {
    let ws = workspace();
    let missing = ws.config.with_file_name("missing.toml");

    let output = content_guard(
        &ws.config,
        &["audit", "--fixture", missing.to_str().unwrap(), "--principal", "jdoe"],
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
