// file: tests/integration_test.rs
// version: 1.0.0
// guid: c1d2e3f4-a5b6-7890-1234-567890cdefab

//! Integration tests for VPS Deploy Agent

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use vps_deploy_agent::config::loader::ConfigLoader;

struct ConfigFixture {
    dir: TempDir,
    config_path: std::path::PathBuf,
}

/// Write a complete config plus the local files it references
fn write_fixture() -> ConfigFixture {
    let dir = TempDir::new().unwrap();

    let artifact = dir.path().join("app-deploy.tar.gz");
    fs::write(&artifact, b"not a real tarball but big enough").unwrap();
    let script = dir.path().join("deploy-from-root.sh");
    fs::write(&script, b"#!/bin/bash\nread -r DOMAIN\nexit 0\n").unwrap();

    let config_content = format!(
        r#"
target:
  host: 203.0.113.10
  username: root
  auth:
    method: password
    password: "${{VPS_ROOT_PASSWORD}}"
  connect_timeout_secs: 5
artifact:
  local_path: {artifact}
  remote_path: /tmp/app-deploy.tar.gz
install_script:
  local_path: {script}
  remote_path: /tmp/deploy-from-root.sh
params:
  domain: game.example.io
  email: admin@example.io
  wallet_address: "7sK1P4vYgQxTn9wB2cD5eF8gH1jK4mN7pQ1rS4tU7vW"
  wallet_secret: "${{PRIZE_WALLET_SECRET}}"
"#,
        artifact = artifact.display(),
        script = script.display(),
    );

    let config_path = dir.path().join("deploy.yaml");
    fs::write(&config_path, config_content).unwrap();

    ConfigFixture { dir, config_path }
}

#[test]
fn test_config_loading_integration() {
    let fx = write_fixture();

    let mut loader = ConfigLoader::new();
    loader.set_env_var("VPS_ROOT_PASSWORD".to_string(), "hunter2".to_string());
    loader.set_env_var("PRIZE_WALLET_SECRET".to_string(), "base58secret".to_string());

    let config = loader.load(&fx.config_path).unwrap();
    assert_eq!(config.target.host, "203.0.113.10");
    assert_eq!(config.target.port, 22);
    assert_eq!(config.params.domain, "game.example.io");
    assert_eq!(config.params.wallet_secret, "base58secret");
    // rpc_url falls back to its default when omitted
    assert!(config.params.rpc_url.contains("mainnet-beta"));

    drop(fx.dir);
}

#[test]
fn test_stdin_payload_matches_script_prompt_order() {
    let fx = write_fixture();

    let mut loader = ConfigLoader::new();
    loader.set_env_var("VPS_ROOT_PASSWORD".to_string(), "hunter2".to_string());
    loader.set_env_var("PRIZE_WALLET_SECRET".to_string(), "base58secret".to_string());

    let config = loader.load(&fx.config_path).unwrap();
    let payload = config.params.stdin_payload();
    let lines: Vec<&str> = payload.split('\n').collect();

    // domain, email, reserved blank, rpc url, wallet address, secret, origin
    assert_eq!(lines[0], "game.example.io");
    assert_eq!(lines[1], "admin@example.io");
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("https://"));
    assert_eq!(lines[4], "7sK1P4vYgQxTn9wB2cD5eF8gH1jK4mN7pQ1rS4tU7vW");
    assert_eq!(lines[5], "base58secret");
    assert_eq!(lines[6], "");
    assert!(payload.ends_with('\n'));
}

#[test]
fn test_check_command_validates_without_connecting() {
    let fx = write_fixture();

    // The target host is TEST-NET-3 so a connection attempt would hang;
    // check must succeed without one.
    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .args(["check", "--config"])
        .arg(&fx.config_path)
        .env("VPS_ROOT_PASSWORD", "hunter2")
        .env("PRIZE_WALLET_SECRET", "base58secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"));
}

#[test]
fn test_check_command_never_prints_secrets() {
    let fx = write_fixture();

    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .args(["check", "--config"])
        .arg(&fx.config_path)
        .env("VPS_ROOT_PASSWORD", "hunter2")
        .env("PRIZE_WALLET_SECRET", "base58secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("base58secret").not());
}

#[test]
fn test_deploy_dry_run_does_not_connect() {
    let fx = write_fixture();

    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .args(["deploy", "--dry-run", "--config"])
        .arg(&fx.config_path)
        .env("VPS_ROOT_PASSWORD", "hunter2")
        .env("PRIZE_WALLET_SECRET", "base58secret")
        .assert()
        .success();
}

#[test]
fn test_missing_secret_env_fails_with_config_error() {
    let fx = write_fixture();

    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .args(["check", "--config"])
        .arg(&fx.config_path)
        .env("VPS_ROOT_PASSWORD", "hunter2")
        .env_remove("PRIZE_WALLET_SECRET")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_check_missing_artifact_fails_precondition() {
    let fx = write_fixture();
    fs::remove_file(fx.dir.path().join("app-deploy.tar.gz")).unwrap();

    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .args(["check", "--config"])
        .arg(&fx.config_path)
        .env("VPS_ROOT_PASSWORD", "hunter2")
        .env("PRIZE_WALLET_SECRET", "base58secret")
        .assert()
        .failure();
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("vps-deploy-agent")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
