//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` inside the rankboard config
//! directory and includes:
//! - The scores API base URL and HTTP timeouts
//! - Debounce windows for search and viewport resizing
//! - Viewport row metrics used to size the table

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RankboardError, Result};
use crate::sync::viewport::ViewportMetrics;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "RANKBOARD_CONFIG_DIR";

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "RANKBOARD_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the scores API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Quiet period after the last keystroke before searching (default: 250)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Quiet period after the last resize before recounting rows (default: 200)
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    /// Viewport breakpoints and row metrics
    #[serde(default, skip_serializing_if = "ViewportMetrics::is_default")]
    pub viewport: ViewportMetrics,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_search_debounce_ms() -> u64 {
    250
}

fn default_resize_debounce_ms() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            search_debounce_ms: default_search_debounce_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            viewport: ViewportMetrics::default(),
        }
    }
}

/// Directory holding `config.yaml` and `settings.yaml`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    directories::ProjectDirs::from("", "", "rankboard")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| RankboardError::Config("cannot determine config directory".to_string()))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            RankboardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RankboardError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            RankboardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// API base URL, honoring the `RANKBOARD_API_URL` override.
    pub fn effective_api_url(&self) -> String {
        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.api_url.clone(),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Reject values that would make the viewport math meaningless.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)?;
        if self.viewport.row_height == 0 {
            return Err(RankboardError::Config(
                "viewport.row_height must be greater than zero".to_string(),
            ));
        }
        if self.viewport.compact_rows == 0
            || self.viewport.medium_rows == 0
            || self.viewport.wide_rows == 0
        {
            return Err(RankboardError::Config(
                "viewport row counts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set a single value by dotted key, as used by `rankboard config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                url::Url::parse(value)?;
                self.api_url = value.to_string();
            }
            "request_timeout" => self.request_timeout = parse_number(key, value)?,
            "connect_timeout" => self.connect_timeout = parse_number(key, value)?,
            "search_debounce_ms" => self.search_debounce_ms = parse_number(key, value)?,
            "resize_debounce_ms" => self.resize_debounce_ms = parse_number(key, value)?,
            "viewport.row_height" => self.viewport.row_height = parse_number(key, value)?,
            "viewport.baseline_height" => {
                self.viewport.baseline_height = parse_number(key, value)?
            }
            "viewport.compact_max_width" => {
                self.viewport.compact_max_width = parse_number(key, value)?
            }
            "viewport.wide_min_width" => self.viewport.wide_min_width = parse_number(key, value)?,
            _ => {
                return Err(RankboardError::InvalidInput(format!(
                    "unknown config key '{key}'"
                )));
            }
        }
        self.validate()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        RankboardError::InvalidInput(format!("'{value}' is not a valid number for {key}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct ConfigDirGuard {
        _dir: TempDir,
    }

    impl ConfigDirGuard {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            // SAFETY: tests touching the environment are serialized.
            unsafe { env::set_var(CONFIG_DIR_ENV, dir.path()) };
            Self { _dir: dir }
        }
    }

    impl Drop for ConfigDirGuard {
        fn drop(&mut self) {
            // SAFETY: tests touching the environment are serialized.
            unsafe { env::remove_var(CONFIG_DIR_ENV) };
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.resize_debounce(), Duration::from_millis(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_yaml_ng::from_str("api_url: https://scores.test\n").unwrap();
        assert_eq!(config.api_url, "https://scores.test");
        assert_eq!(config.search_debounce_ms, 250);
        assert_eq!(config.viewport, ViewportMetrics::default());
    }

    #[test]
    #[serial]
    fn test_load_missing_returns_default() {
        let _guard = ConfigDirGuard::new();
        assert_eq!(Config::load().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        let _guard = ConfigDirGuard::new();
        let mut config = Config::default();
        config.set_value("search_debounce_ms", "400").unwrap();
        config.set_value("viewport.row_height", "40").unwrap();
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.search_debounce_ms, 400);
        assert_eq!(loaded.viewport.row_height, 40);
    }

    #[test]
    fn test_set_value_rejects_unknown_key() {
        let mut config = Config::default();
        let err = config.set_value("nope", "1").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn test_set_value_rejects_zero_row_height() {
        let mut config = Config::default();
        assert!(config.set_value("viewport.row_height", "0").is_err());
    }

    #[test]
    #[serial]
    fn test_api_url_env_override() {
        let config = Config::default();
        // SAFETY: serialized test.
        unsafe { env::set_var(API_URL_ENV, "https://override.test") };
        assert_eq!(config.effective_api_url(), "https://override.test");
        unsafe { env::remove_var(API_URL_ENV) };
        assert_eq!(config.effective_api_url(), default_api_url());
    }
}
