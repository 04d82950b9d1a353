use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dock::LayoutDirection;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side-bar inset reserved next to docked wizard dialogs
    pub side_bar_width: u16,

    /// Edge the side bar sits on
    pub layout_direction: LayoutDirection,

    /// Interval between UI ticks in milliseconds
    pub tick_rate_ms: u64,

    /// Log filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            side_bar_width: 24,
            layout_direction: LayoutDirection::LeftToRight,
            tick_rate_ms: 100,
            log_filter: "maindock=info".to_string(),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit_path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await.unwrap_or_default(),
        };

        // Environment wins over files
        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(width_str) = std::env::var("MAINDOCK_SIDE_BAR_WIDTH") {
            if let Ok(width) = width_str.parse() {
                self.side_bar_width = width;
            }
        }

        if let Ok(direction_str) = std::env::var("MAINDOCK_LAYOUT") {
            match direction_str.parse() {
                Ok(direction) => self.layout_direction = direction,
                Err(e) => debug!("Ignoring MAINDOCK_LAYOUT: {}", e),
            }
        }

        if let Ok(tick_str) = std::env::var("MAINDOCK_TICK_RATE_MS") {
            if let Ok(tick_rate_ms) = tick_str.parse() {
                self.tick_rate_ms = tick_rate_ms;
            }
        }

        if let Ok(filter) = std::env::var("MAINDOCK_LOG") {
            self.log_filter = filter;
        }
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.maindock.yaml"),
            PathBuf::from("./maindock.yaml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("maindock").join("config.yaml"));
        }

        config_paths
    }

    /// Load configuration from the first config file found
    pub async fn load_from_file() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await;
            }
        }

        Err(anyhow::anyhow!("No configuration file found"))
    }

    /// Load configuration from a specific YAML or JSON file
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().map_or(false, |ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("tick_rate_ms must be greater than 0"));
        }

        if self.log_filter.trim().is_empty() {
            return Err(anyhow::anyhow!("log_filter must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.side_bar_width, 24);
        assert_eq!(config.layout_direction, LayoutDirection::LeftToRight);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_yaml_with_partial_fields() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("maindock.yaml");
        std::fs::write(&path, "side_bar_width: 30\nlayout_direction: rtl\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();

        assert_eq!(config.side_bar_width, 30);
        assert_eq!(config.layout_direction, LayoutDirection::RightToLeft);
        assert_eq!(config.tick_rate_ms, Config::default().tick_rate_ms);
    }

    #[tokio::test]
    async fn test_load_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"tick_rate_ms": 250}"#).unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[tokio::test]
    async fn test_load_invalid_file_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.yaml");
        std::fs::write(&path, "side_bar_width: [not a number").unwrap();

        assert!(Config::load_from_path(&path).await.is_err());
        assert!(Config::load_from_path(&temp_dir.path().join("missing.yaml")).await.is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.tick_rate_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.log_filter = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
