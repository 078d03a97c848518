//! Configuration loading and management

use crate::core::error::{AdminResult, ConfigError};
use crate::core::query::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const BASE_URL_ENV: &str = "ADMIN_API_URL";

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://logistics-backend-1-s91j.onrender.com";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the admin REST API, without trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Defaults applied to listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDefaults {
    /// Rows per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_page_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
        }
    }
}

/// Complete configuration for the admin client
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub defaults: ListDefaults,
}

impl AdminConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> AdminResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// File (if any), then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> AdminResult<Self> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    ///
    /// The lookup is injected so callers (and tests) control where values
    /// come from.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Check values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                message: format!("'{}' is not an http(s) URL", url),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.defaults.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "defaults.page_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.defaults.page_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AdminConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AdminConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config =
            AdminConfig::from_yaml_str("api:\n  base_url: http://localhost:4000\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.defaults.page_limit, 10);
    }

    #[test]
    fn test_env_override() {
        let config = AdminConfig::default().apply_env_overrides(|key| {
            (key == BASE_URL_ENV).then(|| "http://127.0.0.1:9000".to_string())
        });
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");

        let untouched = AdminConfig::default().apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AdminConfig::from_yaml_str("api:\n  base_url: ftp://example.com\n").is_err());
        assert!(AdminConfig::from_yaml_str("defaults:\n  page_limit: 0\n").is_err());
        assert!(AdminConfig::from_yaml_str("api: [not, a, map]\n").is_err());
    }
}
