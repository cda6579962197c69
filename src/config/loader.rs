//! Configuration loading and management
//!
//! This module handles loading configuration from files and environment variables.

use std::path::Path;

use tracing::{debug, info};

use super::types::{Config, GeocoderProvider};
use crate::error::ConfigError;

/// Environment variable names recognized by [`load_config_with_env`]
pub const ENV_LOG_LEVEL: &str = "SITE_SCOUT_LOG_LEVEL";
pub const ENV_IPC_SOCKET: &str = "SITE_SCOUT_IPC_SOCKET";
pub const ENV_GEOCODER_PROVIDER: &str = "SITE_SCOUT_GEOCODER_PROVIDER";
pub const ENV_GEOCODER_ENDPOINT: &str = "SITE_SCOUT_GEOCODER_ENDPOINT";
pub const ENV_GEOCODER_TIMEOUT_MS: &str = "SITE_SCOUT_GEOCODER_TIMEOUT_MS";
pub const ENV_ZONING_CATALOG: &str = "SITE_SCOUT_ZONING_CATALOG";

/// Load configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;

    config.validate()?;

    info!(
        "Configuration loaded: geocoder={:?}, cache={}, catalog={}",
        config.geocoder.provider,
        config.cache.enabled,
        config
            .zoning
            .catalog_path
            .as_deref()
            .map_or_else(|| "builtin".to_string(), |p| p.display().to_string())
    );

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with environment variable overrides
///
/// Environment variables:
/// - `SITE_SCOUT_LOG_LEVEL`: Override log level
/// - `SITE_SCOUT_IPC_SOCKET`: Override IPC socket path
/// - `SITE_SCOUT_GEOCODER_PROVIDER`: `seeded` or `http`
/// - `SITE_SCOUT_GEOCODER_ENDPOINT`: Override geocoder search endpoint
/// - `SITE_SCOUT_GEOCODER_TIMEOUT_MS`: Override geocoder deadline
/// - `SITE_SCOUT_ZONING_CATALOG`: Load the zoning catalog from this file
///
/// # Errors
///
/// Returns `ConfigError` if loading or parsing fails.
pub fn load_config_with_env(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Apply overrides from a variable lookup, then re-validate
///
/// # Errors
///
/// Returns `ConfigError::EnvError` for unparseable values, or a validation
/// error if the overridden configuration is invalid.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.log.level = level;
        debug!("Log level overridden to {}", config.log.level);
    }

    if let Some(socket) = lookup(ENV_IPC_SOCKET) {
        config.ipc.socket_path = socket.into();
        debug!("IPC socket path overridden to {:?}", config.ipc.socket_path);
    }

    if let Some(provider) = lookup(ENV_GEOCODER_PROVIDER) {
        config.geocoder.provider = match provider.to_ascii_lowercase().as_str() {
            "seeded" => GeocoderProvider::Seeded,
            "http" => GeocoderProvider::Http,
            _ => {
                return Err(ConfigError::EnvError {
                    name: ENV_GEOCODER_PROVIDER.into(),
                    reason: format!("Unknown provider: {provider}"),
                })
            }
        };
        debug!("Geocoder provider overridden to {:?}", config.geocoder.provider);
    }

    if let Some(endpoint) = lookup(ENV_GEOCODER_ENDPOINT) {
        config.geocoder.endpoint = endpoint;
        debug!("Geocoder endpoint overridden to {}", config.geocoder.endpoint);
    }

    if let Some(ms) = lookup(ENV_GEOCODER_TIMEOUT_MS) {
        config.geocoder.timeout_ms = ms.parse().map_err(|_| ConfigError::EnvError {
            name: ENV_GEOCODER_TIMEOUT_MS.into(),
            reason: format!("Invalid number: {ms}"),
        })?;
        debug!("Geocoder timeout overridden to {}ms", config.geocoder.timeout_ms);
    }

    if let Some(catalog) = lookup(ENV_ZONING_CATALOG) {
        config.zoning.catalog_path = Some(catalog.into());
        debug!("Zoning catalog overridden to {:?}", config.zoning.catalog_path);
    }

    // Re-validate after overrides
    config.validate()
}

/// Create a default configuration file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    std::fs::write(path.as_ref(), json)?;

    info!("Created default configuration at {:?}", path.as_ref());

    Ok(())
}
