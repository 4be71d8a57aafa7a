//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::RepeatApproval;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_loanchat_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, loanchat_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[server]
base_url = "https://loans.example.com/api"

[approval]
repeat = "suppress"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "https://loans.example.com/api");
    assert_eq!(config.approval.repeat, RepeatApproval::Suppress);
    // Defaults preserved
    assert_eq!(config.server.request_timeout_secs, 60);
    assert_eq!(config.upload.max_size_bytes, 5 * 1024 * 1024);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, loanchat_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
request_timeout_secs = 0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.request_timeout_secs, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loanchat").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "http://localhost:5002/api");
    assert!(config.download.open_in_browser);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::LoanchatConfig;

    let config: LoanchatConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_toml_suggests_absolute_paths() {
    use super::template::default_config_toml;

    let toml_str = default_config_toml();
    let suggestion = toml_str
        .lines()
        .find(|l| l.trim_start().starts_with("# output_dir"))
        .unwrap();
    assert!(suggestion.contains("= \"/"));
    assert!(!toml_str.contains("\"~/"));
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("loanchat"));
        assert!(path_str.ends_with("config.toml"));
    }
}
