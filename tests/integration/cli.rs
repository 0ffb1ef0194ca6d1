use crate::common::launcher_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    launcher_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bubba-player://"))
        .stdout(predicate::str::contains("--install-dir"));
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    launcher_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_config_exits_non_zero_without_network() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("launcher.toml"), "setup_endpoints = []\n").unwrap();

    launcher_cmd(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("setup_endpoints must list at least one origin"));
}

#[test]
fn test_malformed_config_reports_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "version_timeout_secs = \"soon\"\n").unwrap();

    launcher_cmd(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("custom.toml"));
}

#[test]
fn test_bad_endpoint_scheme_is_rejected() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("launcher.toml"),
        "setup_endpoints = [\"ftp://setup.example\"]\n",
    )
    .unwrap();

    launcher_cmd(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ftp://setup.example"));
}
