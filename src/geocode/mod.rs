//! Address geocoding
//!
//! ```text
//!              ┌────────────┐
//!              │  Geocoder  │ (trait)
//!              └─────┬──────┘
//!          ┌─────────┴─────────┐
//!   ┌──────┴────────┐   ┌──────┴───────┐
//!   │ SeededGeocoder│   │ HttpGeocoder │
//!   │  (offline)    │   │ (Nominatim)  │
//!   └───────────────┘   └──────────────┘
//!              │
//!     ┌────────┴─────────┐
//!     │ FallbackGeocoder │  timeout + fixed fallback coordinate
//!     └──────────────────┘
//! ```

pub mod fallback;
pub mod http;
pub mod seeded;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

pub use fallback::{FallbackGeocoder, GeocodeOutcome, DEFAULT_FALLBACK};
pub use http::HttpGeocoder;
pub use seeded::SeededGeocoder;
pub use traits::{Geocoder, DEFAULT_GEOCODE_TIMEOUT_MS};

use crate::config::{GeocoderConfig, GeocoderProvider};
use crate::error::GeocodeError;

/// Build the fallback-wrapped geocoder described by the configuration
///
/// # Errors
///
/// Returns `GeocodeError::Config` if the HTTP provider cannot be constructed.
pub fn from_config(config: &GeocoderConfig) -> Result<FallbackGeocoder, GeocodeError> {
    let deadline = Duration::from_millis(config.timeout_ms);
    let inner: Arc<dyn Geocoder> = match config.provider {
        GeocoderProvider::Seeded => Arc::new(SeededGeocoder::new()),
        GeocoderProvider::Http => Arc::new(HttpGeocoder::new(
            &config.endpoint,
            config.user_agent.clone(),
            deadline,
        )?),
    };
    Ok(FallbackGeocoder::new(inner)
        .with_deadline(deadline)
        .with_fallback(config.fallback))
}
