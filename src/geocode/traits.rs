//! Geocoder trait
//!
//! A geocoder turns free-text addresses into coordinates. Implementations
//! may fail; callers that need a coordinate no matter what wrap them in a
//! [`FallbackGeocoder`](super::FallbackGeocoder).

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GeocodeError;
use crate::zoning::Coordinate;

/// Default geocoding timeout in milliseconds
pub const DEFAULT_GEOCODE_TIMEOUT_MS: u64 = 5000;

/// Address-to-coordinate provider
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one instance can serve
/// concurrent requests.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Geocode an address
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` if the address is unusable, the provider has
    /// no result, or the request fails or times out.
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;

    /// Provider name for logs and errors
    fn name(&self) -> &str;

    /// Per-request deadline
    fn timeout(&self) -> Duration {
        Duration::from_millis(DEFAULT_GEOCODE_TIMEOUT_MS)
    }
}
