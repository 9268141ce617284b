//! Configuration loading from warden.toml.

use access::Catalog;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Principal store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Resource catalog (`[[resource]]` entries).
    #[serde(flatten)]
    pub catalog: Catalog,
}

/// Which backing the principal store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

/// Principal store configuration.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("user_data.json")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Create a default configuration.
    pub fn default_config() -> Self {
        Self {
            store: StoreConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.store.backend, Backend::Json);
        assert_eq!(config.store.path, PathBuf::from("user_data.json"));
        assert_eq!(config.catalog, Catalog::default());
    }

    #[test]
    fn test_sqlite_with_custom_catalog() {
        let toml = r#"
[store]
backend = "sqlite"
path = "principals.db"

[[resource]]
id = "overview"
title = "Overview"

[[resource]]
id = "screener"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.store.backend, Backend::Sqlite);
        assert_eq!(config.store.path, PathBuf::from("principals.db"));
        let ids: Vec<_> = config.catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["overview", "screener"]);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let toml = r#"
[store]
backend = "postgres"
"#;
        assert!(matches!(Config::parse(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let toml = r#"
[[resource]]
id = "a"

[[resource]]
id = "a"
"#;
        assert!(matches!(Config::parse(toml), Err(ConfigError::Parse(_))));
    }
}
