use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn isolated_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tmux-statusline").expect("binary available");
    // Keep user-level config and the weather API key out of the test run.
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("WEATHER_API_KEY")
        .current_dir(home);
    cmd
}

#[test]
fn cli_renders_left_side() {
    let temp_home = tempdir().expect("create temp home");

    // The left side carries the uptime segment, which always renders (a
    // placeholder when /proc is unavailable).
    let assert = isolated_cmd(temp_home.path())
        .arg("left")
        .arg("--force-text")
        .arg("--no-colors")
        .assert()
        .success();
    assert.stdout(predicate::str::contains("\u{21d1}"));
}

#[test]
fn cli_requires_a_side() {
    let temp_home = tempdir().expect("create temp home");

    isolated_cmd(temp_home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("left|right"));
}

#[test]
fn cli_rejects_unknown_side() {
    let temp_home = tempdir().expect("create temp home");

    isolated_cmd(temp_home.path())
        .arg("center")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown side"));
}

#[test]
fn cli_right_side_without_api_key_still_succeeds() {
    let temp_home = tempdir().expect("create temp home");
    // Weather has no API key in the isolated env and load may have no
    // /proc/loadavg; the render must still exit cleanly.
    isolated_cmd(temp_home.path())
        .arg("right")
        .arg("--force-text")
        .assert()
        .success();
}

#[test]
fn cli_config_init_creates_project_file() {
    let temp_home = tempdir().expect("create temp home");
    let project_dir = temp_home.path().join("workspace");
    fs::create_dir_all(&project_dir).expect("create project dir");

    isolated_cmd(temp_home.path())
        .arg("config")
        .arg("init")
        .arg(project_dir.to_str().unwrap())
        .arg("--force")
        .arg("--theme")
        .arg("powerline")
        .assert()
        .success();

    let config_path = project_dir.join("statusline.toml");
    assert!(config_path.exists(), "project config not created");

    let raw = fs::read_to_string(&config_path).expect("config readable");
    assert!(raw.contains("theme = \"powerline\""));
}

#[test]
fn cli_validate_accepts_written_config() {
    let temp_home = tempdir().expect("create temp home");
    let config_path = temp_home.path().join("statusline.toml");
    fs::write(
        &config_path,
        "theme = \"classic\"\n\n[segments.weather]\nlocation = \"Oslo\"\n",
    )
    .expect("write config");

    isolated_cmd(temp_home.path())
        .arg("validate")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("config valid"));
}

#[test]
fn cli_validate_rejects_broken_config() {
    let temp_home = tempdir().expect("create temp home");
    let config_path = temp_home.path().join("statusline.toml");
    fs::write(&config_path, "theme = [unterminated\n").expect("write config");

    isolated_cmd(temp_home.path())
        .arg("validate")
        .arg(config_path.to_str().unwrap())
        .assert()
        .failure();
}

#[test]
fn cli_config_set_updates_custom_file() {
    let temp_home = tempdir().expect("create temp home");
    let config_path = temp_home.path().join("statusline.toml");
    fs::write(&config_path, "theme = \"classic\"\n").expect("write config");

    isolated_cmd(temp_home.path())
        .arg("config")
        .arg("--file")
        .arg(config_path.to_str().unwrap())
        .arg("set")
        .arg("segments.weather.units")
        .arg("c")
        .assert()
        .success();

    let raw = fs::read_to_string(&config_path).expect("config readable");
    assert!(raw.contains("units = \"c\""));
    assert!(raw.contains("theme = \"classic\""));
}

#[test]
fn cli_run_honors_custom_config() {
    let temp_home = tempdir().expect("create temp home");
    let config_path = temp_home.path().join("statusline.toml");
    // Move uptime to the right side and disable the network-facing segment.
    fs::write(
        &config_path,
        concat!(
            "theme = \"classic\"\n\n",
            "[segments.uptime]\nside = \"right\"\n\n",
            "[segments.load]\nenabled = false\n\n",
            "[segments.weather]\nenabled = false\n",
        ),
    )
    .expect("write config");

    let assert = isolated_cmd(temp_home.path())
        .arg("right")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--force-text")
        .arg("--no-colors")
        .assert()
        .success();
    assert.stdout(predicate::str::contains("\u{21d1}"));

    let assert = isolated_cmd(temp_home.path())
        .arg("left")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--force-text")
        .arg("--no-colors")
        .assert()
        .success();
    assert.stdout(predicate::str::contains("\u{21d1}").not());
}

#[test]
fn cli_doctor_reports_environment() {
    let temp_home = tempdir().expect("create temp home");

    isolated_cmd(temp_home.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("color support"));
}
