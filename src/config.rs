//! Configuration management for `SkyCast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkyCastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `SkyCast` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkyCastConfig {
    /// Open-Meteo endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Memoization settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Open-Meteo API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL of the historical archive API
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,
    /// Language for geocoding results
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; 0 keeps entries for the whole run
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("SkyCast/{}", crate::VERSION)
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            archive_base_url: default_archive_base_url(),
            language: default_language(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CacheConfig {
    /// TTL for the memo cache; `None` when expiry is disabled
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl SkyCastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_API__TIMEOUT_SECONDS=10
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkyCastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.geocoding_base_url.is_empty() {
            self.api.geocoding_base_url = default_geocoding_base_url();
        }
        if self.api.archive_base_url.is_empty() {
            self.api.archive_base_url = default_archive_base_url();
        }
        if self.api.language.is_empty() {
            self.api.language = default_language();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(SkyCastError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.cache.ttl_seconds > 7 * 24 * 60 * 60 {
            return Err(SkyCastError::config("Cache TTL cannot exceed 1 week").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkyCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkyCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("geocoding", &self.api.geocoding_base_url),
            ("archive", &self.api.archive_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkyCastError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        let language = &self.api.language;
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(SkyCastError::config(format!(
                "Invalid language '{}'. Expected a two-letter code such as 'en'",
                self.api.language
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SkyCastConfig::default();
        assert_eq!(
            config.api.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.api.archive_base_url, "https://archive-api.open-meteo.com/v1");
        assert_eq!(config.api.language, "en");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let mut config = SkyCastConfig::default();
        config.cache.ttl_seconds = 0;
        assert_eq!(config.cache.ttl(), None);
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SkyCastConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SkyCastConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = SkyCastConfig::default();
        config.api.archive_base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("archive base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = SkyCastConfig::default();
        config.api.language = String::new();
        config.api.timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.api.language, "en");
        assert_eq!(config.api.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\n\
             timeout_seconds = 12\n\
             archive_base_url = \"http://localhost:9000/v1\"\n\
             \n\
             [logging]\n\
             format = \"json\""
        )
        .unwrap();

        let config = SkyCastConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.timeout_seconds, 12);
        assert_eq!(config.api.archive_base_url, "http://localhost:9000/v1");
        assert_eq!(config.api.language, "en");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SkyCastConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("skycast"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
