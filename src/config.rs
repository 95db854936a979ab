//! Application settings, optionally read from `crypto_tracker.toml`.

use crate::data::{HistoryRequest, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "crypto_tracker.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Market-data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub range: String,
    pub interval: String,
    /// None keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let request = HistoryRequest::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            range: request.range,
            interval: request.interval,
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    pub fn history_request(&self) -> HistoryRequest {
        HistoryRequest {
            range: self.range.clone(),
            interval: self.interval.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Chart figure and display sizes, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub display_max_width: u32,
    pub display_max_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            display_max_width: 800,
            display_max_height: 400,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub chart: ChartConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.provider;
        if p.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url is empty".into()));
        }
        if p.range.trim().is_empty() || p.interval.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.range and provider.interval must be set".into(),
            ));
        }
        if p.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("provider.timeout_secs must be positive".into()));
        }

        let c = &self.chart;
        if c.width == 0 || c.height == 0 || c.display_max_width == 0 || c.display_max_height == 0 {
            return Err(ConfigError::Invalid("chart sizes must be non-zero".into()));
        }
        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
