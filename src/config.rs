//! Engine configuration file handling.
//!
//! The configuration is a JSON document; every field is optional and falls
//! back to the built-in default. The style/season catalog can be replaced
//! here without touching the grower.
//!
//! ```json
//! {
//!   "store_dir": "/home/me/.bonsai/trees",
//!   "cache_ttl_hours": 24,
//!   "hemisphere": "southern",
//!   "debug": false
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::types::Hemisphere;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "BONSAI_CONFIG";

/// Default cache lifetime for stored trees
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Engine configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding one JSON record per stored tree
    pub store_dir: PathBuf,
    /// Lifetime of read-through cache entries
    pub cache_ttl_hours: u64,
    /// Used to derive the default season from the date
    pub hemisphere: Hemisphere,
    /// Trace resolved options on every generation
    pub debug: bool,
    /// Style and season parameters
    pub catalog: Catalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_dir: default_root().join("trees"),
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            hemisphere: Hemisphere::default(),
            debug: false,
            catalog: Catalog::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config named by `BONSAI_CONFIG`, else `~/.bonsai/config.json`,
    /// else the defaults.
    pub fn discover() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_root().join("config.json"));
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Catalog contents are checked when the catalog is deserialized.
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_hours == 0 {
            anyhow::bail!("cache_ttl_hours must be at least 1");
        }
        if self.store_dir.as_os_str().is_empty() {
            anyhow::bail!("store_dir must be specified");
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache_ttl_hours as i64)
    }
}

fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bonsai")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.hemisphere, Hemisphere::Northern);
        assert!(!config.debug);
        assert!(config.store_dir.ends_with(".bonsai/trees"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"hemisphere": "southern", "debug": true}"#).unwrap();
        assert_eq!(config.hemisphere, Hemisphere::Southern);
        assert!(config.debug);
        assert_eq!(config.cache_ttl_hours, DEFAULT_CACHE_TTL_HOURS);
        assert_eq!(config.catalog, Catalog::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = EngineConfig::new();
        config.store_dir = dir.path().join("trees");
        config.cache_ttl_hours = 6;

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"cache_ttl_hours": 0}"#).unwrap();
        let err = EngineConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("cache_ttl_hours"));
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"catalog": {"styles": {}, "palettes": {}}}"#).unwrap();
        assert!(EngineConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EngineConfig::load_from_file("/nonexistent/bonsai.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bonsai.json"));
    }
}
