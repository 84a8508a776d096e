//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::aggregation::PeriodThresholds;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Granularity selection thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_max_readings_per_day")]
    pub max_readings_per_day: usize,

    #[serde(default = "default_raw_max_span_days")]
    pub raw_max_span_days: f64,

    #[serde(default = "default_weekly_max_span_days")]
    pub weekly_max_span_days: f64,

    #[serde(default = "default_biweekly_max_span_days")]
    pub biweekly_max_span_days: f64,
}

fn default_max_readings_per_day() -> usize {
    PeriodThresholds::default().max_readings_per_day
}

fn default_raw_max_span_days() -> f64 {
    PeriodThresholds::default().raw_max_span_days
}

fn default_weekly_max_span_days() -> f64 {
    PeriodThresholds::default().weekly_max_span_days
}

fn default_biweekly_max_span_days() -> f64 {
    PeriodThresholds::default().biweekly_max_span_days
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_readings_per_day: default_max_readings_per_day(),
            raw_max_span_days: default_raw_max_span_days(),
            weekly_max_span_days: default_weekly_max_span_days(),
            biweekly_max_span_days: default_biweekly_max_span_days(),
        }
    }
}

impl AggregationConfig {
    /// Thresholds for the aggregation engine
    pub fn thresholds(&self) -> PeriodThresholds {
        PeriodThresholds {
            max_readings_per_day: self.max_readings_per_day,
            raw_max_span_days: self.raw_max_span_days,
            weekly_max_span_days: self.weekly_max_span_days,
            biweekly_max_span_days: self.biweekly_max_span_days,
        }
    }
}

/// How readings are presented to the viewer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// IANA time zone name (e.g. "Europe/Berlin"); the system zone when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

impl DisplayConfig {
    /// Resolve the configured zone, `None` meaning the system zone
    pub fn tz(&self) -> Result<Option<chrono_tz::Tz>, ConfigError> {
        self.timezone.as_deref().map(parse_timezone).transpose()
    }
}

/// Parse an IANA time zone name
pub fn parse_timezone(name: &str) -> Result<chrono_tz::Tz, ConfigError> {
    name.trim()
        .parse::<chrono_tz::Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
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

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        // Surface a bad zone name at load time rather than at first use
        config.display.tz()?;

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
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("vitalchart").join("config.toml")),
            Some(PathBuf::from("./vitalchart.toml")),
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

        // Fall back to environment-only config
        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(tz) = std::env::var("VITALCHART_TIMEZONE") {
            self.display.timezone = Some(tz);
        }

        if let Ok(max) = std::env::var("VITALCHART_MAX_READINGS_PER_DAY") {
            if let Ok(n) = max.parse() {
                self.aggregation.max_readings_per_day = n;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("VITALCHART_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VITALCHART_LOG_FORMAT") {
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

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# vitalchart configuration
#
# Environment variables override these settings:
# - VITALCHART_TIMEZONE
# - VITALCHART_MAX_READINGS_PER_DAY
# - VITALCHART_LOG_LEVEL
# - VITALCHART_LOG_FORMAT

[aggregation]
# A single day with more readings than this switches to daily averages
max_readings_per_day = 10

# Datasets spanning up to this many days are charted raw
raw_max_span_days = 180

# Up to this many days: weekly averages
weekly_max_span_days = 730

# Up to this many days: bi-weekly averages; longer spans use monthly averages
biweekly_max_span_days = 1825

[display]
# IANA time zone used for calendar days, weeks and months.
# Defaults to the system time zone.
# timezone = "Europe/Berlin"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
