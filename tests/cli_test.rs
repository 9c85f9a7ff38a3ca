//! Integration tests for the command-line interface.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MISSING_PEER: &str = r#"{"name":"app","peerDependencies":{"right-pad":"^1.0.0"}}"#;

fn setup_project(manifest: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), manifest).unwrap();
    temp
}

/// The binary, isolated from the caller's environment and the network.
fn peer_dep_helper(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("peer-dep-helper"));
    cmd.current_dir(temp.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--offline");
    for (key, _) in std::env::vars() {
        if key.starts_with("PEER_DEP_HELPER_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("peer-dep-helper"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("fix"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("peer-dep-helper"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_audit_reports_missing_peer() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "right-pad (required by app) requires ^1.0.0 but is missing.",
        ))
        .stdout(predicate::str::contains("Total Checked"));
    Ok(())
}

#[test]
fn cli_audit_fail_on_issues_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["audit", "--fail-on-issues"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn cli_audit_json_is_the_only_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    let output = peer_dep_helper(&temp).args(["audit", "--json"]).output()?;

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["status"], "fail");
    assert_eq!(report["issues"][0]["package"], "right-pad");
    assert_eq!(report["issues"][0]["status"], "missing");
    assert_eq!(report["issues"][0]["requiredVersion"], "^1.0.0");
    Ok(())
}

#[test]
fn cli_silent_suppresses_report() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["audit", "--silent"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn cli_missing_manifest_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    peer_dep_helper(&temp)
        .arg("audit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No package.json found"));
    Ok(())
}

#[test]
fn cli_cwd_flag_selects_project() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    let elsewhere = TempDir::new()?;
    let mut cmd = peer_dep_helper(&elsewhere);
    cmd.args(["audit", "--cwd"]).arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("right-pad"));
    Ok(())
}

#[test]
fn cli_fix_dry_run_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["fix", "--dry-run", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Dry Run] No changes will be made."))
        .stdout(predicate::str::contains(
            "[Dry Run] Would install: right-pad@* (required range: ^1.0.0)",
        ));

    assert_eq!(
        fs::read_to_string(temp.path().join("package.json"))?,
        MISSING_PEER
    );
    assert!(!temp.path().join("node_modules").exists());
    Ok(())
}

#[test]
fn cli_fix_only_outside_allow_list_has_nothing_to_fix() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["fix", "--only", "left-pad"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No fixable peer dependency issues found.",
        ));
    Ok(())
}

#[test]
fn cli_no_cache_leaves_no_cache_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["audit", "--no-cache"])
        .assert()
        .success();
    assert!(!temp.path().join(".peer-dep-helper-cache.json").exists());

    peer_dep_helper(&temp).arg("audit").assert().success();
    assert!(temp.path().join(".peer-dep-helper-cache.json").exists());
    Ok(())
}

#[test]
fn cli_reads_rc_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    fs::write(temp.path().join(".peer-dep-helperrc"), "failOnIssues: true\n")?;
    peer_dep_helper(&temp).arg("audit").assert().code(1);
    Ok(())
}

#[test]
fn cli_env_ignore_list_applies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .env("PEER_DEP_HELPER_IGNORE", "right-pad")
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No peer dependency issues found."))
        .stdout(predicate::str::contains(
            "No issues found after applying ignore list.",
        ));
    Ok(())
}

#[test]
fn cli_invalid_strategy_in_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    fs::write(temp.path().join(".peer-dep-helperrc"), "strategy: newest\n")?;
    peer_dep_helper(&temp)
        .arg("audit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn cli_malformed_rc_file_warns_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    fs::write(temp.path().join(".peer-dep-helperrc"), "failOnIssues: [unclosed\n")?;
    peer_dep_helper(&temp)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("right-pad"))
        .stderr(predicate::str::contains("Could not load"));
    Ok(())
}

#[test]
fn cli_audit_fix_dry_run_skips_reaudit() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    peer_dep_helper(&temp)
        .args(["audit", "--fix", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Dry Run] No changes will be made."))
        .stdout(predicate::str::contains("Re-auditing").not());
    assert!(!temp.path().join("node_modules").exists());
    Ok(())
}

#[test]
fn cli_invalid_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("peer-dep-helper"));
    cmd.arg("nonexistent-command");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_debug_logs_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MISSING_PEER);
    let output = peer_dep_helper(&temp).args(["audit", "--json", "--debug"]).output()?;
    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout)?;
    assert!(String::from_utf8_lossy(&output.stderr).contains("DEBUG"));
    Ok(())
}
