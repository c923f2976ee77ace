//! Application configuration

use anyhow::Result;
use drivesafe_types::{SerialSourceConfig, SourceMode, SyntheticSourceConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version of the config format
    pub version: u32,
    /// Source that drives the dashboard
    pub mode: SourceMode,
    pub serial: SerialSourceConfig,
    pub synthetic: SyntheticSourceConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "drivesafe", "drivesafe")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if given, else from the default location
    ///
    /// Unreadable or invalid files fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        };
        match loaded {
            Ok(config) => {
                info!("Loaded configuration");
                config
            }
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            mode: SourceMode::default(),
            serial: SerialSourceConfig::default(),
            synthetic: SyntheticSourceConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    1000
}

fn default_alert_rows() -> usize {
    5
}

/// Console dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How often the dashboard is redrawn
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
    /// Number of recent alerts shown
    #[serde(default = "default_alert_rows")]
    pub alert_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            alert_rows: default_alert_rows(),
        }
    }
}
