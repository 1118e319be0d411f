use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_roost_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("roost")
}

#[test]
fn test_status_empty_home() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path()).arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Credentials:  none stored"))
        .stdout(predicate::str::contains("Auto-login:   disabled"))
        .stdout(predicate::str::contains("starts at the sign-in screen"))
        .stdout(predicate::str::contains("loginData.json"));
}

#[test]
fn test_status_with_stored_credentials() {
    let home = tempfile::tempdir().unwrap();

    Command::new(get_roost_bin())
        .env("ROOST_HOME", home.path())
        .args(["creds", "set", "--user", "student01", "--password", "hunter2"])
        .assert()
        .success();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path()).arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stored for student01"))
        .stdout(predicate::str::contains("Auto-login:   enabled"))
        .stdout(predicate::str::contains("opens the portal directly"));
}

#[test]
fn test_status_auto_login_off_still_opens_portal() {
    let home = tempfile::tempdir().unwrap();

    Command::new(get_roost_bin())
        .env("ROOST_HOME", home.path())
        .args([
            "creds",
            "set",
            "--user",
            "student01",
            "--password",
            "hunter2",
            "--no-auto-login",
        ])
        .assert()
        .success();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path()).arg("status");

    // Stored credentials decide the gate even with auto-login off
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Auto-login:   disabled"))
        .stdout(predicate::str::contains("opens the portal directly"));
}

#[test]
fn test_status_json_format() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path())
        .args(["status", "--format", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"has_credentials\": false"))
        .stdout(predicate::str::contains("\"auto_login_enabled\": false"))
        .stdout(predicate::str::contains("\"phase\": \"unknown\""))
        .stdout(predicate::str::contains("\"attempts\": 0"));
}

#[test]
fn test_status_json_with_credentials() {
    let home = tempfile::tempdir().unwrap();

    Command::new(get_roost_bin())
        .env("ROOST_HOME", home.path())
        .args(["creds", "set", "--user", "student01", "--password", "hunter2"])
        .assert()
        .success();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path())
        .args(["status", "--format", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"has_credentials\": true"))
        .stdout(predicate::str::contains("\"auto_login_enabled\": true"));
}

#[test]
fn test_status_ignores_malformed_store() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("loginData.json"), "not json").unwrap();

    let mut cmd = Command::new(get_roost_bin());
    cmd.env("ROOST_HOME", home.path()).arg("status");

    // A broken store reads as absent credentials
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Credentials:  none stored"));
}
