//! Geocoder wrapper that never fails
//!
//! Any error or timeout from the inner geocoder is logged and replaced by
//! the configured fallback coordinate, so downstream resolution always has
//! a coordinate to work with.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::warn;

use super::traits::Geocoder;
use crate::error::GeocodeError;
use crate::zoning::Coordinate;

/// Coordinate used when geocoding fails (New York City center)
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(40.7128, -74.0060);

/// Result of a fallback-protected geocode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeOutcome {
    /// Resolved coordinate (or the fallback)
    pub coordinate: Coordinate,
    /// Whether the fallback coordinate was substituted
    pub fallback_used: bool,
}

/// Geocoder wrapper with a deadline and a fixed fallback coordinate
#[derive(Debug, Clone)]
pub struct FallbackGeocoder {
    inner: Arc<dyn Geocoder>,
    fallback: Coordinate,
    deadline: Duration,
}

impl FallbackGeocoder {
    /// Wrap a geocoder, using its own timeout as the deadline
    #[must_use]
    pub fn new(inner: Arc<dyn Geocoder>) -> Self {
        let deadline = inner.timeout();
        Self {
            inner,
            fallback: DEFAULT_FALLBACK,
            deadline,
        }
    }

    /// Override the fallback coordinate
    #[must_use]
    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override the deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// The coordinate substituted on failure
    #[must_use]
    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Name of the wrapped provider
    #[must_use]
    pub fn provider(&self) -> &str {
        self.inner.name()
    }

    /// Geocode, substituting the fallback coordinate on any failure
    pub async fn resolve(&self, address: &str) -> GeocodeOutcome {
        let result = match timeout(self.deadline, self.inner.geocode(address)).await {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::timeout(self.inner.name(), self.deadline)),
        };

        match result {
            Ok(coordinate) if coordinate.is_finite() => GeocodeOutcome {
                coordinate,
                fallback_used: false,
            },
            Ok(coordinate) => {
                warn!(
                    provider = self.inner.name(),
                    address,
                    %coordinate,
                    "geocoder returned a non-finite coordinate, using fallback"
                );
                self.fallback_outcome()
            }
            Err(e) => {
                warn!(
                    provider = self.inner.name(),
                    address,
                    error = %e,
                    "geocoding failed, using fallback coordinate"
                );
                self.fallback_outcome()
            }
        }
    }

    fn fallback_outcome(&self) -> GeocodeOutcome {
        GeocodeOutcome {
            coordinate: self.fallback,
            fallback_used: true,
        }
    }
}
