#![allow(clippy::unwrap_used)]
// End-to-end tests for the `wanwatch` binary that need no network.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn wanwatch() -> Command {
    let mut cmd = Command::cargo_bin("wanwatch").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    wanwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--once"));
}

#[test]
fn test_print_config_masks_passwords() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[controller]\npassword = \"hunter2\"").unwrap();

    wanwatch()
        .arg("--config")
        .arg(file.path())
        .arg("--print-config")
        .env("UNTFY_PRIMARY_IFACE", "eth3")
        .assert()
        .success()
        .stdout(predicate::str::contains("primary_iface = \"eth3\""))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_missing_config_file_exits_with_config_code() {
    wanwatch()
        .arg("--config")
        .arg("/definitely/not/here.toml")
        .assert()
        .code(2);
}

#[test]
fn test_missing_ntfy_url_exits_with_config_code() {
    let file = tempfile::NamedTempFile::new().unwrap();

    wanwatch()
        .arg("--config")
        .arg(file.path())
        .env_remove("UNTFY_NTFY_URL")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_unreachable_controller_exits_with_auth_code() {
    let file = tempfile::NamedTempFile::new().unwrap();

    wanwatch()
        .arg("--config")
        .arg(file.path())
        .arg("--once")
        .env("UNTFY_CONTROLLER_URL", "http://127.0.0.1:9")
        .env("UNTFY_NTFY_URL", "http://127.0.0.1:9")
        .assert()
        .code(3);
}
