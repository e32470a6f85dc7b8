//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Appliance API configuration
    pub api: ApiConfig,

    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base address of the appliance, e.g. http://pi.hole
    pub base_url: String,

    /// Shared secret for the auth exchange
    #[serde(default)]
    pub password: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable ANSI colors in rendered dashboards
    pub enable_colors: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            password: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enable_colors: true,
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        // PIWATCH_BASE_URL - appliance base address
        if let Ok(base_url) = env::var("PIWATCH_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url;
            }
        }

        // PIWATCH_PASSWORD - shared secret
        if let Ok(password) = env::var("PIWATCH_PASSWORD") {
            self.api.password = password;
        }

        // PIWATCH_TIMEOUT_SECONDS - request timeout
        if let Ok(timeout) = env::var("PIWATCH_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.api.timeout_seconds = value;
            }
        }

        // PIWATCH_LOG_LEVEL - logging level
        if let Ok(log_level) = env::var("PIWATCH_LOG_LEVEL") {
            self.log_level = log_level;
        }

        // PIWATCH_ENABLE_COLORS - ANSI colors in dashboards
        if let Ok(enable_colors) = env::var("PIWATCH_ENABLE_COLORS") {
            self.render.enable_colors = enable_colors.parse().unwrap_or(self.render.enable_colors);
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to environment-only defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(&path).unwrap_or_else(|err| {
            tracing::debug!("Failed to load config: {}, using defaults", err);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("Appliance base URL must be specified (api.base_url or PIWATCH_BASE_URL)");
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            anyhow::bail!("Appliance base URL must start with http:// or https://");
        }

        if self.api.timeout_seconds == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        Ok(())
    }
}
