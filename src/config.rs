use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_base_value")]
    pub base_value: f64,
    #[serde(default = "default_max_constituents")]
    pub max_constituents: usize,
    /// Before this instant the index is pinned to `base_value`.
    #[serde(default = "default_launch_at")]
    pub launch_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_base_value() -> f64 { 20.0 }
fn default_max_constituents() -> usize { 20 }
fn default_launch_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
fn default_base_url() -> String { "https://api.coingecko.com/api/v3".to_string() }
fn default_category() -> String { "privacy-coins".to_string() }
fn default_per_page() -> u32 { 100 }
fn default_timeout_secs() -> u64 { 10 }
fn default_enabled() -> bool { true }
fn default_data_dir() -> String { "./data".to_string() }
fn default_interval_secs() -> u64 { 60 }
fn default_cache_ttl_secs() -> u64 { 30 }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_value: default_base_value(),
            max_constituents: default_max_constituents(),
            launch_at: default_launch_at(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category: default_category(),
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Missing file means defaults; a file that exists but is broken is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.index.base_value, 20.0);
        assert_eq!(config.index.max_constituents, 20);
        assert_eq!(config.provider.per_page, 100);
        assert!(config.storage.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [index]
            base_value = 100.0
            launch_at = "2025-06-01T00:00:00Z"

            [refresh]
            interval_secs = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.index.base_value, 100.0);
        assert_eq!(config.index.max_constituents, 20);
        assert_eq!(
            config.index.launch_at,
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(config.refresh.interval_secs, 120);
        assert_eq!(config.refresh.cache_ttl_secs, 30);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[index\nbase_value = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
