//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_agora_config.toml"));
    assert!(matches!(
        result,
        Err(agora_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
url = "https://agora.example.org"

[onboarding]
completed = true
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.url, "https://agora.example.org");
    assert!(config.onboarding.completed);
    // Defaults preserved
    assert!(config.presence.enabled);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(config.presence_ready());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(agora_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
url = "ftp://nope"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.url, "ftp://nope");
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agora").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert!(config.server.url.is_empty());
    assert!(!config.onboarding.completed);
    assert!(config.presence.enabled);
}

#[test]
fn default_template_is_valid_toml() {
    let config: crate::schema::AgoraConfig =
        toml::from_str(&template::default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn first_run_writes_template_and_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agora").join("config.toml");

    let config = loader::load_or_create(&path).unwrap();
    assert!(!config.onboarding.completed);
    assert!(std::fs::read_to_string(&path)
        .unwrap()
        .starts_with("# Agora Configuration"));
}

#[test]
fn creating_default_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nurl = \"http://mine:3000\"\n").unwrap();

    create_default_config(&path).unwrap();

    assert_eq!(load_from_path(&path).unwrap().server.url, "http://mine:3000");
}
