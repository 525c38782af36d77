//! Integration tests for config file location and parsing

use std::path::PathBuf;
use tempfile::TempDir;
use ytpm_common::config::{load_toml_config, locate_config, ConfigOverrides, MonitorConfig};
use ytpm_common::Error;

#[test]
fn test_explicit_config_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ytpm.toml");
    std::fs::write(
        &path,
        r#"
        interval_minutes = 15
        state_file = "/var/lib/ytpm/state.json"

        [notifier]
        to_email = "me@example.com"
        "#,
    )
    .unwrap();

    let (found, toml) = locate_config(Some(&path)).unwrap();
    assert_eq!(found, Some(path));

    let config = MonitorConfig::resolve(&ConfigOverrides::default(), &toml);
    assert_eq!(config.interval_minutes, 15);
    assert_eq!(config.state_file, PathBuf::from("/var/lib/ytpm/state.json"));
    assert_eq!(config.notifier.to_email, "me@example.com");
}

#[test]
fn test_explicit_missing_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = locate_config(Some(&temp_dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unparsable_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "prefix_size = \"three\"").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_empty_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();

    let toml = load_toml_config(&path).unwrap();
    let config = MonitorConfig::resolve(&ConfigOverrides::default(), &toml);
    assert_eq!(config.prefix_size, 3);
}
