#![allow(clippy::unwrap_used)]
// CLI-level tests: argument parsing, local validation, config handling.
// Nothing here talks to a real backend.

use assert_cmd::Command;
use predicates::prelude::*;

/// Binary with config/env isolated to a temp home.
fn milkfleet(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("milkfleet").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("alerts"))
        .stdout(predicate::str::contains("pricing"))
        .stdout(predicate::str::contains("account"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn no_args_shows_usage() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_url_is_a_config_error() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .args(["devices", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No backend URL configured"));
}

#[test]
fn invalid_url_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .args(["status", "-u", "not a url"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn non_positive_price_fails_locally() {
    let home = tempfile::tempdir().unwrap();
    // Port 9 (discard) -- validation must reject before any connection.
    milkfleet(&home)
        .args(["pricing", "set", "0", "-u", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn negative_withdrawal_fails_locally() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .args([
            "account",
            "withdraw",
            "--yes",
            "-u",
            "http://127.0.0.1:9",
            "--",
            "-5",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn withdrawal_without_yes_needs_a_terminal() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .args(["account", "withdraw", "5", "-u", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn completions_generate_for_bash() {
    let home = tempfile::tempdir().unwrap();
    milkfleet(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("milkfleet"));
}

#[test]
fn config_init_then_show_round_trips() {
    let home = tempfile::tempdir().unwrap();

    milkfleet(&home)
        .args(["config", "init", "--url", "http://fleet.local:5000"])
        .assert()
        .success();

    milkfleet(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://fleet.local:5000"));

    milkfleet(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
