//! Configuration management
//!
//! Provider credentials and priority order, read once at startup.
//! Config location: ~/.config/geolocus/config.toml, with environment
//! overrides for deployment (GEOLOCUS_AMAP_KEY, GEOLOCUS_TENCENT_KEY,
//! GEOLOCUS_PROVIDERS, GEOLOCUS_TIMEOUT_SECS).

use crate::constants::http::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
const APP_DIR_NAME: &str = "geolocus";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider credentials and priority
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Provider credentials and priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Provider names in selection priority order; the first configured
    /// provider in this list is the active one
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,

    /// Amap (Gaode) credentials
    #[serde(default)]
    pub amap: ProviderKey,

    /// Tencent LBS credentials
    #[serde(default)]
    pub tencent: ProviderKey,
}

/// API key for a single provider; an empty key means "not configured"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderKey {
    #[serde(default)]
    pub key: String,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_priority() -> Vec<String> {
    vec!["amap".to_string(), "tencent".to_string()]
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            amap: ProviderKey::default(),
            tencent: ProviderKey::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, then apply environment
    /// overrides
    ///
    /// A missing config file is not an error; defaults are used and the
    /// environment may still supply credentials.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            Self::load_path(&path)?
        } else {
            Config::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEOLOCUS_AMAP_KEY") {
            self.providers.amap.key = key;
        }
        if let Ok(key) = std::env::var("GEOLOCUS_TENCENT_KEY") {
            self.providers.tencent.key = key;
        }
        if let Ok(priority) = std::env::var("GEOLOCUS_PROVIDERS") {
            self.providers.priority = priority
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(secs) = std::env::var("GEOLOCUS_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.http.timeout_secs = secs;
            }
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 || self.http.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(Error::Config(format!(
                "timeout_secs {} is out of range [1, {}]",
                self.http.timeout_secs, MAX_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.providers.priority, vec!["amap", "tencent"]);
        assert_eq!(config.providers.amap.key, "");
        assert_eq!(config.http.timeout_secs, 8);
    }

    #[test]
    fn test_load_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(
            &path,
            r#"
[providers]
priority = ["tencent", "amap"]

[providers.amap]
key = "amap-key"

[providers.tencent]
key = "tencent-key"

[http]
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = Config::load_path(&path).unwrap();
        assert_eq!(config.providers.priority, vec!["tencent", "amap"]);
        assert_eq!(config.providers.amap.key, "amap-key");
        assert_eq!(config.providers.tencent.key, "tencent-key");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_load_path_partial_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(&path, "[providers.amap]\nkey = \"k\"\n").unwrap();

        let config = Config::load_path(&path).unwrap();
        assert_eq!(config.providers.priority, vec!["amap", "tencent"]);
        assert_eq!(config.providers.amap.key, "k");
        assert_eq!(config.http.timeout_secs, 8);
    }

    #[test]
    fn test_load_path_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(&path, "not valid [ toml").unwrap();

        let err = Config::load_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.http.timeout_secs = 61;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.providers.amap.key = "abc".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(loaded.providers.amap.key, "abc");
        assert_eq!(loaded.providers.priority, vec!["amap", "tencent"]);
    }
}
