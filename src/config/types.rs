//! Configuration types for site-scout
//!
//! Configuration is loaded from a JSON file. Every section is optional and
//! falls back to defaults, so `{}` is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geocode::{DEFAULT_FALLBACK, DEFAULT_GEOCODE_TIMEOUT_MS};
use crate::zoning::Coordinate;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Control socket configuration
    #[serde(default)]
    pub ipc: IpcConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Geocoder configuration
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Site record cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Zoning catalog source
    #[serde(default)]
    pub zoning: ZoningConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ipc.validate()?;
        self.log.validate()?;
        self.geocoder.validate()?;
        self.cache.validate()?;
        self.zoning.validate()?;
        Ok(())
    }

    /// Create a default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }
}

/// Control socket configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IpcConfig {
    /// Path to Unix socket
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Socket file mode (octal, e.g., 0o660)
    #[serde(default = "default_socket_mode")]
    pub socket_mode: u32,

    /// Enable IPC server
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum message size in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl IpcConfig {
    /// Validate IPC configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for an empty socket path or a
    /// zero message size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.socket_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "IPC socket path cannot be empty when IPC is enabled".into(),
            ));
        }

        if self.max_message_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_size must be greater than 0".into(),
            ));
        }

        if self.socket_mode > 0o777 {
            return Err(ConfigError::ValidationError(format!(
                "socket_mode {:o} is not a valid permission mode",
                self.socket_mode
            )));
        }

        Ok(())
    }
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            socket_mode: default_socket_mode(),
            enabled: true,
            max_message_size: default_max_message_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include target (module path)
    #[serde(default = "default_true")]
    pub target: bool,
}

impl LogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.format.as_str(), "json" | "text") {
            return Err(ConfigError::ValidationError(format!(
                "log.format must be \"json\" or \"text\", got \"{}\"",
                self.format
            )));
        }
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: true,
        }
    }
}

/// Which geocoding provider to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderProvider {
    /// Offline, address-seeded coordinates
    #[default]
    Seeded,
    /// Nominatim-compatible HTTP search API
    Http,
}

/// Geocoder configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    /// Provider selection
    #[serde(default)]
    pub provider: GeocoderProvider,

    /// Search endpoint for the HTTP provider
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,

    /// User-Agent header sent by the HTTP provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request deadline in milliseconds
    #[serde(default = "default_geocoder_timeout_ms")]
    pub timeout_ms: u64,

    /// Coordinate substituted when geocoding fails
    #[serde(default = "default_fallback")]
    pub fallback: Coordinate,
}

impl GeocoderConfig {
    /// Request deadline
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "geocoder.timeout_ms must be greater than 0".into(),
            ));
        }
        if !self.fallback.is_finite() {
            return Err(ConfigError::ValidationError(
                "geocoder.fallback must be a finite coordinate".into(),
            ));
        }
        if self.provider == GeocoderProvider::Http {
            if self.endpoint.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "geocoder.endpoint is required for the http provider".into(),
                ));
            }
            if self.user_agent.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "geocoder.user_agent is required for the http provider".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_ms: default_geocoder_timeout_ms(),
            fallback: default_fallback(),
        }
    }
}

/// Site record cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Enable the cache
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached site records
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,

    /// Time to live in seconds (0 = no expiry)
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be greater than 0 when the cache is enabled".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Zoning catalog configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ZoningConfig {
    /// JSON catalog replacing the builtin one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl ZoningConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.catalog_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "zoning.catalog_path cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

// Default value functions

const fn default_true() -> bool {
    true
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/var/run/site-scout.sock")
}

const fn default_socket_mode() -> u32 {
    0o660
}

const fn default_max_message_size() -> usize {
    1024 * 1024
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".into()
}

fn default_user_agent() -> String {
    concat!("site-scout/", env!("CARGO_PKG_VERSION")).into()
}

const fn default_geocoder_timeout_ms() -> u64 {
    DEFAULT_GEOCODE_TIMEOUT_MS
}

const fn default_fallback() -> Coordinate {
    DEFAULT_FALLBACK
}

const fn default_cache_max_entries() -> u64 {
    10_000
}

const fn default_cache_ttl_secs() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_valid() {
        let config: Config = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
        assert!(config.ipc.enabled);
        assert_eq!(config.geocoder.provider, GeocoderProvider::Seeded);
        assert_eq!(config.geocoder.fallback, DEFAULT_FALLBACK);
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(config.zoning.catalog_path.is_none());
    }

    #[test]
    fn test_provider_names() {
        let config: GeocoderConfig = serde_json::from_str(r#"{"provider": "http"}"#).unwrap();
        assert_eq!(config.provider, GeocoderProvider::Http);
        assert!(serde_json::from_str::<GeocoderConfig>(r#"{"provider": "google"}"#).is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default_config();
        config.ipc.max_message_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.log.format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.geocoder.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.geocoder.fallback = Coordinate::unknown();
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.geocoder.provider = GeocoderProvider::Http;
        config.geocoder.endpoint = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());
        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_coordinate_from_json() {
        let json = r#"{"geocoder": {"fallback": {"lat": 42.3314, "lng": -83.0458}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.geocoder.fallback, Coordinate::new(42.3314, -83.0458));
    }
}
