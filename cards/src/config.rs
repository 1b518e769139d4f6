//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default catalog endpoint
pub const DEFAULT_URL: &str = "https://mtgjson.com/json/AllCards-x.json";

/// User agent presented to the catalog endpoint
pub const DEFAULT_USER_AGENT: &str = "github.com_broady_mtg";

/// Top-level configuration for the `cards` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Catalog store configuration
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: ./cardstore.yml
        let local_config = PathBuf::from("cardstore.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/cardstore/cardstore.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cardstore").join("cardstore.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => {
                let local = PathBuf::from("cardstore.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("cardstore").join("cardstore.yml")
                }
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Configuration for the catalog store and its HTTP source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Catalog endpoint
    pub url: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Milliseconds between refresh attempts; 0 means refresh once at startup only
    #[serde(rename = "refresh-interval-ms")]
    pub refresh_interval_ms: u64,

    /// Whole-request timeout in milliseconds; 0 (the default) means none
    ///
    /// The full feed is large, so a non-zero value must leave room for a slow
    /// transfer or every refresh will be cut off.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// How many leading body bytes to include when logging a failed response
    #[serde(rename = "excerpt-limit")]
    pub excerpt_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            refresh_interval_ms: 60 * 60 * 1000,
            timeout_ms: 0,
            excerpt_limit: 1000,
        }
    }
}

impl StoreConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}
