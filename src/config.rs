use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const GOLD_PRICE_BASE_URL: &str = "https://data-asg.goldprice.org";
pub const PRIMARY_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const BACKUP_RATE_URL: &str = "https://open.er-api.com/v6/latest/USD";

const DEFAULT_CURRENCY: &str = "CNY";
const DEFAULT_REFRESH_SECS: u64 = 10;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoldSourceConfig {
    pub base_url: String,
}

impl Default for GoldSourceConfig {
    fn default() -> Self {
        GoldSourceConfig {
            base_url: GOLD_PRICE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateSourcesConfig {
    pub primary_url: String,
    pub backup_url: String,
}

impl Default for RateSourcesConfig {
    fn default() -> Self {
        RateSourcesConfig {
            primary_url: PRIMARY_RATE_URL.to_string(),
            backup_url: BACKUP_RATE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub gold: GoldSourceConfig,
    #[serde(default)]
    pub rates: RateSourcesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sources: SourcesConfig::default(),
            currency: default_currency(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the config file if one exists, else the built-in defaults. The
    /// endpoints and refresh interval are fixed constants in normal use; the
    /// file exists to redirect them during development and testing.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "goldwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.sources.gold.base_url, GOLD_PRICE_BASE_URL);
        assert_eq!(config.sources.rates.primary_url, PRIMARY_RATE_URL);
        assert_eq!(config.sources.rates.backup_url, BACKUP_RATE_URL);
        assert_eq!(config.currency, "CNY");
        assert_eq!(config.refresh_secs, 10);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml_str = r#"
currency: "EUR"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.sources.gold.base_url, GOLD_PRICE_BASE_URL);
    }

    #[test]
    fn test_full_override() {
        let yaml_str = r#"
sources:
  gold:
    base_url: "http://localhost:8080"
  rates:
    primary_url: "http://localhost:8081/v4/latest/USD"
    backup_url: "http://localhost:8082/v6/latest/USD"
currency: "CNY"
refresh_secs: 30
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.sources.gold.base_url, "http://localhost:8080");
        assert_eq!(
            config.sources.rates.primary_url,
            "http://localhost:8081/v4/latest/USD"
        );
        assert_eq!(config.refresh_secs, 30);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "refresh_secs: 5\n").expect("Failed to write config");

        let config = AppConfig::load_from_path(&path).expect("Failed to load config");
        assert_eq!(config.refresh_secs, 5);
        assert_eq!(config.currency, "CNY");
    }
}
