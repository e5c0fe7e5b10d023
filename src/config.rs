//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::directory::{CollisionPolicy, Coordinates};
use crate::prediction::{is_valid_time, DEFAULT_HORA};
use crate::presenter::MapSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prediction API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means the transport defaults apply
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Neighborhood directory configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub collision_policy: CollisionPolicy,

    /// CSV of coordinates for name-only metadata
    #[serde(default)]
    pub gazetteer: Option<PathBuf>,
}

/// Map view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,

    #[serde(default = "default_reset_on_missing")]
    pub reset_on_missing: bool,
}

fn default_latitude() -> f64 {
    -8.0476
}

fn default_longitude() -> f64 {
    -34.8770
}

fn default_zoom() -> u8 {
    11
}

fn default_focus_zoom() -> u8 {
    14
}

fn default_reset_on_missing() -> bool {
    true
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
            reset_on_missing: default_reset_on_missing(),
        }
    }
}

impl MapConfig {
    pub fn to_settings(&self) -> MapSettings {
        MapSettings {
            default_center: Coordinates::new(self.default_latitude, self.default_longitude),
            default_zoom: self.default_zoom,
            focus_zoom: self.focus_zoom,
            reset_on_missing: self.reset_on_missing,
        }
    }
}

/// Form defaults
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Sent when the time field is empty
    #[serde(default = "default_hora")]
    pub default_hora: String,
}

fn default_hora() -> String {
    DEFAULT_HORA.to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_hora: default_hora(),
        }
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

        Self::parse(&content, path)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
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

    /// Load from an explicit path, or from default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("crimecast").join("config.toml")),
            Some(PathBuf::from("./crimecast.toml")),
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

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_time(&self.form.default_hora) {
            return Err(ConfigError::Invalid(format!(
                "form.default_hora '{}' is not HH:MM",
                self.form.default_hora
            )));
        }
        if self.map.focus_zoom < self.map.default_zoom {
            return Err(ConfigError::Invalid(format!(
                "map.focus_zoom ({}) is below map.default_zoom ({})",
                self.map.focus_zoom, self.map.default_zoom
            )));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CRIMECAST_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(path) = std::env::var("CRIMECAST_GAZETTEER") {
            self.directory.gazetteer = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var("CRIMECAST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CRIMECAST_LOG_FORMAT") {
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

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Crimecast Configuration
#
# Environment variables override these settings:
# - CRIMECAST_API_URL
# - CRIMECAST_GAZETTEER
# - CRIMECAST_LOG_LEVEL
# - CRIMECAST_LOG_FORMAT

[api]
# Prediction API base URL (serves /metadata and /predict)
base_url = "http://localhost:5000"

# Request timeout in seconds (omit to use the transport default)
# request_timeout_secs = 30

[directory]
# What to do when two neighborhoods share a name:
# last_write_wins, reject, per_city
collision_policy = "last_write_wins"

# CSV with bairro,cidade,latitude,longitude for servers that only send names
# gazetteer = "./bairros.csv"

[map]
# Overview position (Recife)
default_latitude = -8.0476
default_longitude = -34.8770
default_zoom = 11

# Zoom used when focusing a result
focus_zoom = 14

# Return to the overview when a neighborhood has no coordinates
reset_on_missing = true

[form]
# Time sent when the time field is left empty
default_hora = "00:00"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
