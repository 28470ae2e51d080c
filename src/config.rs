//! Configuration file support for HSPT.
//!
//! Settings live in a versioned JSON file in the platform config directory.
//! A missing or unreadable file is not an error for the command line tool:
//! it falls back to defaults and says so in the log.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAME, DEFAULT_FALLBACK_BANDS, DEFAULT_GAIN_SUFFIX, DEFAULT_PICK_OUTPUT,
    DEFAULT_RGB_WAVELENGTHS,
};
use crate::data::DataExtension;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// RGB preview settings
    #[serde(default)]
    pub preview: PreviewConfig,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Extension for data files written next to cube headers
    #[serde(default)]
    pub data_extension: DataExtension,

    /// Appended to the file stem of gain adjusted cubes
    #[serde(default = "default_gain_suffix")]
    pub gain_suffix: String,

    /// Where picked point waveforms are written
    #[serde(default = "default_pick_output")]
    pub pick_output: PathBuf,
}

fn default_gain_suffix() -> String {
    DEFAULT_GAIN_SUFFIX.to_string()
}

fn default_pick_output() -> PathBuf {
    PathBuf::from(DEFAULT_PICK_OUTPUT)
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            data_extension: DataExtension::default(),
            gain_suffix: default_gain_suffix(),
            pick_output: default_pick_output(),
        }
    }
}

/// RGB preview section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Red, green and blue wavelengths in nanometres
    #[serde(default = "default_rgb_wavelengths")]
    pub rgb_wavelengths: [f64; 3],

    /// Red, green and blue band indices for cubes without wavelengths
    #[serde(default = "default_fallback_bands")]
    pub fallback_bands: [usize; 3],
}

fn default_rgb_wavelengths() -> [f64; 3] {
    DEFAULT_RGB_WAVELENGTHS
}

fn default_fallback_bands() -> [usize; 3] {
    DEFAULT_FALLBACK_BANDS
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            rgb_wavelengths: default_rgb_wavelengths(),
            fallback_bands: default_fallback_bands(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            preview: PreviewConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default config file name.
    pub fn default_filename() -> &'static str {
        CONFIG_FILENAME
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join(CONFIG_DIR).join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join(CONFIG_DIR)
                    .join(Self::default_filename())
            })
        }
    }

    /// Read configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Load from `path`, or the default path when `None`.
    ///
    /// Falls back to defaults if the file doesn't exist or can't be read.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::debug!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.preferences.data_extension = DataExtension::Dat;
        config.preview.rgb_wavelengths = [650.0, 550.0, 450.0];

        let json = config.to_json().unwrap();
        assert!(json.contains("\"log_level\": \"debug\""));
        assert!(json.contains("\"data_extension\": \"dat\""));
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_newer_version_rejected() {
        let json = format!("{{\"version\": {}}}", CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AppConfig::from_json("{\"version\": 1}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.preferences.gain_suffix, "-gain-adjusted");
        assert_eq!(config.preview.fallback_bands, [102, 85, 55]);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);
        let mut config = AppConfig::new();
        config.preferences.pick_output = PathBuf::from("picks.csv");

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
        assert_eq!(AppConfig::load_or_default(Some(&path)), config);
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(
            LogLevel::Trace.to_level_filter(),
            log::LevelFilter::Trace
        );
    }
}
