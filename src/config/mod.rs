//! Configuration module for site-scout
//!
//! This module provides configuration types and loading utilities.
//!
//! # Example
//!
//! ```no_run
//! use site_scout::config::{load_config, Config};
//!
//! let config = load_config("/etc/site-scout/config.json").unwrap();
//! println!("Geocoder: {:?}", config.geocoder.provider);
//! ```

mod loader;
mod types;

pub use loader::{
    apply_env_overrides, create_default_config, load_config, load_config_str,
    load_config_with_env, ENV_GEOCODER_ENDPOINT, ENV_GEOCODER_PROVIDER, ENV_GEOCODER_TIMEOUT_MS,
    ENV_IPC_SOCKET, ENV_LOG_LEVEL, ENV_ZONING_CATALOG,
};
pub use types::{
    CacheConfig, Config, GeocoderConfig, GeocoderProvider, IpcConfig, LogConfig, ZoningConfig,
};
