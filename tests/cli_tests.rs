//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config, data and runtime dirs pointed into `dir`
fn pasteback(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pasteback").unwrap();
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env("XDG_RUNTIME_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Clipboard history"))
        .stdout(predicate::str::contains("--daemon"))
        .stdout(predicate::str::contains("--preserve-clipboard"))
        .stdout(predicate::str::contains("--picker"))
        .stdout(predicate::str::contains("paste"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pasteback"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Usage"));
}

#[cfg(target_os = "linux")]
#[test]
fn config_path_follows_xdg_config_home() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join("config").join("pasteback").join("config.toml");

    pasteback(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn config_help() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();

    pasteback(&dir)
        .args(["config", "set", "restore_delay_ms", "450"])
        .assert()
        .success();

    pasteback(&dir)
        .args(["config", "get", "restore_delay_ms"])
        .assert()
        .success()
        .stdout(predicate::str::diff("450\n"));
}

#[test]
fn config_init_twice_fails() {
    let dir = TempDir::new().unwrap();

    pasteback(&dir).args(["config", "init"]).assert().success();
    pasteback(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_list_shows_secondary_keys() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("secondary.keys"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn client_commands_need_a_running_daemon() {
    let dir = TempDir::new().unwrap();
    for args in [
        vec!["list"],
        vec!["paste", "0"],
        vec!["clear"],
        vec!["daemon", "status"],
        vec!["daemon", "toggle"],
    ] {
        pasteback(&dir)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("No daemon running"));
    }
}

#[test]
fn invalid_hotkey_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .args(["--daemon", "--hotkey", "Hyper+V"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid hotkey"));
}

#[test]
fn invalid_keystroke_tool_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    pasteback(&dir)
        .args(["daemon", "--keystroke-tool", "ydotool"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid keystroke tool"));
}
