//! Configuration loading from files on disk

use logistics_admin::config::{AdminConfig, DEFAULT_BASE_URL};
use logistics_admin::core::error::{AdminError, ConfigError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
api:
  base_url: http://localhost:4000
  timeout_secs: 5
defaults:
  page_limit: 25
"#,
    );

    let config = AdminConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:4000");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.defaults.page_limit, 25);
}

#[test]
fn test_empty_file_means_defaults() {
    let file = write_config("{}\n");
    let config = AdminConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.defaults.page_limit, 10);
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdminConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, AdminError::Config(ConfigError::Read { .. })));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_invalid_value_names_the_field() {
    let file = write_config("api:\n  timeout_secs: 0\n");
    match AdminConfig::from_yaml_file(file.path()).unwrap_err() {
        AdminError::Config(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "api.timeout_secs")
        }
        other => panic!("expected invalid value, got {other:?}"),
    }
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let file = write_config("api: [unterminated\n");
    let err = AdminConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, AdminError::Config(ConfigError::Parse(_))));
}
