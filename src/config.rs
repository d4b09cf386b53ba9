//! Configuration module for Photomania

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::images::DEFAULT_CAPACITY;
use crate::models::ImageSize;

/// Environment variable that overrides the configured consumer key
pub const CONSUMER_KEY_ENV: &str = "PHOTOMANIA_CONSUMER_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the photo API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API consumer key
    #[serde(default)]
    pub consumer_key: String,

    /// Photo stream to browse (popular, upcoming, editors, fresh_today)
    #[serde(default = "default_feature")]
    pub feature: String,

    /// Image size requested for grid thumbnails
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: ImageSize,

    /// Image size requested for the full-screen viewer
    #[serde(default = "default_viewer_size")]
    pub viewer_size: ImageSize,

    /// Number of photos per feed page
    #[serde(default = "default_photos_per_page")]
    pub photos_per_page: u32,

    /// Maximum number of decoded images kept in memory
    #[serde(default = "default_image_cache_capacity")]
    pub image_cache_capacity: usize,

    /// Fraction of the scrollable extent that triggers the next page
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.500px.com/v1".to_string()
}

fn default_feature() -> String {
    "popular".to_string()
}

fn default_thumbnail_size() -> ImageSize {
    ImageSize::Medium
}

fn default_viewer_size() -> ImageSize {
    ImageSize::Large
}

fn default_photos_per_page() -> u32 {
    50
}

fn default_image_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_scroll_threshold() -> f64 {
    0.8
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            consumer_key: String::new(),
            feature: default_feature(),
            thumbnail_size: default_thumbnail_size(),
            viewer_size: default_viewer_size(),
            photos_per_page: default_photos_per_page(),
            image_cache_capacity: default_image_cache_capacity(),
            scroll_threshold: default_scroll_threshold(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("photomania");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default path or create default, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(std::env::var(CONSUMER_KEY_ENV).ok());
        Ok(config)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Replace the stored consumer key
    pub fn set_consumer_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Consumer key cannot be empty");
        }
        self.consumer_key = key.to_string();
        Ok(())
    }

    fn apply_env(&mut self, consumer_key: Option<String>) {
        if let Some(key) = consumer_key.filter(|k| !k.trim().is_empty()) {
            self.consumer_key = key.trim().to_string();
        }
    }

    /// HTTP request timeout
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Scroll threshold clamped to `(0, 1]`
    pub fn scroll_threshold(&self) -> f64 {
        if self.scroll_threshold.is_finite() && self.scroll_threshold > 0.0 {
            self.scroll_threshold.min(1.0)
        } else {
            default_scroll_threshold()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.photos_per_page, 50);
        assert_eq!(config.viewer_size, ImageSize::Large);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            consumer_key: "secret".into(),
            feature: "editors".into(),
            image_cache_capacity: 10,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "feature = \"fresh_today\"\nthumbnail_size = \"small\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feature, "fresh_today");
        assert_eq!(config.thumbnail_size, ImageSize::Small);
        assert_eq!(config.api_base_url, "https://api.500px.com/v1");
    }

    #[test]
    fn test_stored_key_keeps_other_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "feature = \"upcoming\"\n").unwrap();

        let mut config = Config::load_from(&path).unwrap();
        assert!(config.set_consumer_key("   ").is_err());
        config.set_consumer_key(" abc123 ").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.consumer_key, "abc123");
        assert_eq!(loaded.feature, "upcoming");
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(Some("  from-env ".into()));
        assert_eq!(config.consumer_key, "from-env");

        config.apply_env(Some("   ".into()));
        assert_eq!(config.consumer_key, "from-env");
    }

    #[test]
    fn test_scroll_threshold_clamped() {
        let mut config = Config::default();
        assert!((config.scroll_threshold() - 0.8).abs() < f64::EPSILON);
        config.scroll_threshold = 3.0;
        assert!((config.scroll_threshold() - 1.0).abs() < f64::EPSILON);
        config.scroll_threshold = -1.0;
        assert!((config.scroll_threshold() - 0.8).abs() < f64::EPSILON);
    }
}
