//! Dictionary configuration, read from a TOML file.
//!
//! ```toml
//! [api]
//! url = "https://api.playmonumenta.com/items"
//! timeout_secs = 30
//!
//! [storage]
//! catalog_path = "config/mid/items.json"
//!
//! [loading]
//! mode = "lenient"   # or "strict"
//!
//! [logging]
//! level = "info"
//!
//! [formatting.masterwork_tiers]
//! Rare = 2
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::catalog::LoadMode;
use crate::errors::{CatalogError, Result};
use crate::formatter::FormatRules;

pub const DEFAULT_CONFIG_PATH: &str = "config/mid/dictionary.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub loading: LoadingConfig,
    pub logging: LoggingConfig,
    pub formatting: FormatRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.playmonumenta.com/items".to_string(),
            user_agent: format!("item-dictionary/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub catalog_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("config/mid/items.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub mode: LoadMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CatalogError::ConfigError(e.to_string()))
    }

    pub async fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, Config::default().to_toml_string()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.loading.mode, LoadMode::Lenient);
        assert_eq!(config.storage.catalog_path, PathBuf::from("config/mid/items.json"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [api]
            timeout_secs = 5

            [loading]
            mode = "strict"

            [logging]
            level = "debug"

            [formatting.masterwork_tiers]
            Rare = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.url, ApiConfig::default().url);
        assert_eq!(config.loading.mode, LoadMode::Strict);
        assert_eq!(config.logging.level_filter(), LevelFilter::Debug);
        assert_eq!(config.formatting.masterwork_tiers.get("Rare"), Some(&3));
        assert_eq!(config.formatting.charm_region, "Architect's Ring");
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let result = Config::from_toml_str("[loading]\nmode = \"sloppy\"");
        assert!(matches!(result, Err(CatalogError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let logging = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(logging.level_filter(), LevelFilter::Info);
    }

    #[tokio::test]
    async fn test_create_default_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mid").join("dictionary.toml");

        Config::create_default(&path).await.unwrap();
        let config = Config::load(&path).await.unwrap();

        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.toml")).await;
        assert!(matches!(result, Err(CatalogError::IoError(_))));
    }
}
