mod fixtures;

use std::fs;

use fixtures::{inquiro, temp_home};
use predicates::prelude::*;

#[test]
fn test_config_path_command() {
    let home = temp_home();

    inquiro(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let home = temp_home();
    let config_path = home.path().join("config.toml");

    assert!(!config_path.exists());

    inquiro(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("api_base_url ="));
    assert!(contents.contains("debounce_ms ="));
    assert!(contents.contains("# directory ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let home = temp_home();
    let config_path = home.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    inquiro(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_generate_prints_defaults() {
    let home = temp_home();

    inquiro(&home)
        .args(["config", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_size = 20"))
        .stdout(predicate::str::contains("debounce_ms = 500"));
}

#[test]
fn test_broken_config_still_reports_path() {
    let home = temp_home();
    fs::write(home.path().join("config.toml"), "page_size = [").unwrap();

    inquiro(&home)
        .args(["config", "path"])
        .assert()
        .success();

    inquiro(&home)
        .args(["history", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}
