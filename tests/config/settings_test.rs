//! Tests for loading generator settings from disk.

use std::fs;
use std::path::PathBuf;

use pivot_query::config::{Settings, SettingsError};

fn write_config(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pivot_query_settings_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let path = write_config(
        "full.toml",
        "[generator]\ninner_alias = \"partial\"\npretty = false\n",
    );

    let settings = Settings::load(&path).unwrap();

    assert_eq!(settings.generator.inner_alias, "partial");
    assert!(!settings.generator.pretty);
}

#[test]
fn test_load_empty_file_uses_defaults() {
    let path = write_config("empty.toml", "");

    let settings = Settings::load(&path).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("pivot_query_settings_does_not_exist.toml");

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, SettingsError::FileNotFound(p) if p == path));
}

#[test]
fn test_invalid_toml() {
    let path = write_config("broken.toml", "[generator\npretty = 1\n");

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn test_rejects_quoted_alias() {
    let path = write_config("alias.toml", "[generator]\ninner_alias = \"pre aggregated\"\n");

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, SettingsError::InvalidConfig(_)));
    assert!(err.to_string().contains("inner_alias"));
}
