//! End-to-end tests for the `homefeed` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn homefeed(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("homefeed").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("HOMEFEED_CONFIG")
        .env_remove("HOMEFEED_DATABASE")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    homefeed(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("schema-load"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_schema_load_then_seed() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("feed.db");

    homefeed(&home)
        .args(["schema-load", "--database"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema loaded"));
    assert!(db.exists());

    homefeed(&home)
        .args(["seed", "--database"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 5 activities"));
}

#[test]
fn test_seed_uses_default_data_dir() {
    let home = TempDir::new().unwrap();

    homefeed(&home).arg("seed").assert().success();
    assert!(home.path().join("data/homefeed/homefeed.db").exists());
}

#[test]
fn test_database_from_config_file() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("from-config.db");
    let config = home.path().join("homefeed.json");
    std::fs::write(
        &config,
        serde_json::json!({ "database": db }).to_string(),
    )
    .unwrap();

    homefeed(&home)
        .arg("--config")
        .arg(&config)
        .arg("schema-load")
        .assert()
        .success();
    assert!(db.exists());
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();

    homefeed(&home)
        .args(["--config", "/definitely/not/here.json", "schema-load"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_init_config_writes_default() {
    let home = TempDir::new().unwrap();

    homefeed(&home).arg("init-config").assert().success();

    let written = home.path().join("config/homefeed/config.json");
    let content = std::fs::read_to_string(written).unwrap();
    assert!(content.contains("127.0.0.1:4567"));
}

#[test]
fn test_init_config_writes_explicit_path() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("new.json");

    homefeed(&home)
        .arg("--config")
        .arg(&config)
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("new.json"));

    assert!(config.exists());
    assert!(!home.path().join("config/homefeed/config.json").exists());

    // The written file is then usable as --config
    homefeed(&home)
        .arg("--config")
        .arg(&config)
        .args(["schema-load", "--database"])
        .arg(home.path().join("feed.db"))
        .assert()
        .success();
}
