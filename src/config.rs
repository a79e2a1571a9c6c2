//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::FixedOffset;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::view_model::{MonthMatching, ViewModelBuilder};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub remotes: RemotesConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Account/statement service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Session token, normally supplied by the host shell
    #[serde(default)]
    pub token: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            token: None,
        }
    }
}

/// Locations of the sibling frontends in the host shell
#[derive(Debug, Clone, Deserialize)]
pub struct RemotesConfig {
    #[serde(default = "default_root_url")]
    pub root_url: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_financeiro_url")]
    pub financeiro_url: String,

    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

fn default_root_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_base_url() -> String {
    "http://localhost:9001".to_string()
}

fn default_financeiro_url() -> String {
    "http://localhost:9002".to_string()
}

fn default_dashboard_url() -> String {
    "http://localhost:9003".to_string()
}

impl Default for RemotesConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            base_url: default_base_url(),
            financeiro_url: default_financeiro_url(),
            dashboard_url: default_dashboard_url(),
        }
    }
}

/// View-model and refresh behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Offset from UTC in which calendar months are evaluated
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,

    #[serde(default)]
    pub month_matching: MonthMatching,

    /// Number of categories listed next to the breakdown chart
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Refresh period for `watch`
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_utc_offset() -> i32 {
    -180 // Brasília
}

fn default_top_categories() -> usize {
    5
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset(),
            month_matching: MonthMatching::default(),
            top_categories: default_top_categories(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl DashboardConfig {
    /// The configured offset, if it is within a day of UTC
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ConfigError::Invalid {
                field: "dashboard.utc_offset_minutes",
                error: format!("{} is not within ±24h", self.utc_offset_minutes),
            }
        })
    }

    /// View-model builder using these settings
    pub fn builder(&self) -> Result<ViewModelBuilder, ConfigError> {
        Ok(ViewModelBuilder::new(self.utc_offset()?, self.month_matching))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bytebank").join("config.toml")),
            Some(PathBuf::from("/etc/bytebank/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check that every service URL is absolute and the dashboard settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("api.base_url", &self.api.base_url),
            ("remotes.root_url", &self.remotes.root_url),
            ("remotes.base_url", &self.remotes.base_url),
            ("remotes.financeiro_url", &self.remotes.financeiro_url),
            ("remotes.dashboard_url", &self.remotes.dashboard_url),
        ];

        for (field, value) in urls {
            Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                error: e.to_string(),
            })?;
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "api.request_timeout_secs",
                error: "must be greater than zero".to_string(),
            });
        }

        self.dashboard.utc_offset()?;
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("BYTEBANK_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("BYTEBANK_REQUEST_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }
        if let Ok(token) = std::env::var("BYTEBANK_TOKEN") {
            self.api.token = Some(token);
        }

        // Remote overrides
        if let Ok(url) = std::env::var("BYTEBANK_REMOTE_ROOT_URL") {
            self.remotes.root_url = url;
        }
        if let Ok(url) = std::env::var("BYTEBANK_REMOTE_BASE_URL") {
            self.remotes.base_url = url;
        }
        if let Ok(url) = std::env::var("BYTEBANK_REMOTE_FINANCEIRO_URL") {
            self.remotes.financeiro_url = url;
        }
        if let Ok(url) = std::env::var("BYTEBANK_REMOTE_DASHBOARD_URL") {
            self.remotes.dashboard_url = url;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("BYTEBANK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BYTEBANK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid URL for {field} ({value:?}): {error}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        error: String,
    },

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Bytebank Dashboard Configuration
#
# Environment variables override these settings:
# - BYTEBANK_API_BASE_URL
# - BYTEBANK_REQUEST_TIMEOUT_SECS
# - BYTEBANK_TOKEN
# - BYTEBANK_REMOTE_ROOT_URL
# - BYTEBANK_REMOTE_BASE_URL
# - BYTEBANK_REMOTE_FINANCEIRO_URL
# - BYTEBANK_REMOTE_DASHBOARD_URL
# - BYTEBANK_LOG_LEVEL
# - BYTEBANK_LOG_FORMAT

[api]
# Account and statement service
base_url = "http://localhost:3000"

# Request timeout in seconds
request_timeout_secs = 30

# Session token (usually provided by the host shell)
# token = ""

[remotes]
root_url = "http://localhost:9000"
base_url = "http://localhost:9001"
financeiro_url = "http://localhost:9002"
dashboard_url = "http://localhost:9003"

[dashboard]
# Offset from UTC used to decide which month a transaction belongs to
utc_offset_minutes = -180

# How transactions are matched to the six-month window: label or year_month
month_matching = "label"

# Categories listed next to the breakdown chart
top_categories = 5

# Refresh period for `watch` (seconds)
refresh_interval_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
