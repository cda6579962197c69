//! Site queries and site ids
//!
//! Site ids are derived from the query itself, so any id can be decoded back
//! into the query that produced it:
//!
//! - address queries: URL-safe base64 of the address (no padding)
//! - coordinate queries: `"<lat>,<lng>"`
//!
//! The comma never appears in the URL-safe alphabet, which keeps the two
//! forms unambiguous.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::SiteError;
use crate::zoning::Coordinate;

/// A request-scoped site search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteQuery {
    /// Free-text address, geocoded when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl SiteQuery {
    /// Query by address
    pub fn by_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Query by coordinate
    #[must_use]
    pub fn by_coordinates(lat: f64, lng: f64) -> Self {
        Self {
            address: None,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// The address, if present and not blank
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Explicit coordinate, if both components were supplied
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }

    /// Check that the query names a site
    ///
    /// # Errors
    ///
    /// Returns `SiteError::MissingQuery` if there is neither an address nor
    /// a full coordinate pair.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.address().is_none() && self.coordinate().is_none() {
            return Err(SiteError::MissingQuery);
        }
        Ok(())
    }

    /// Stable id for this query
    ///
    /// # Errors
    ///
    /// Returns `SiteError::MissingQuery` for an empty query.
    pub fn site_id(&self) -> Result<String, SiteError> {
        if let Some(address) = self.address() {
            return Ok(URL_SAFE_NO_PAD.encode(address.as_bytes()));
        }
        self.coordinate()
            .map(|c| format!("{},{}", c.lat, c.lng))
            .ok_or(SiteError::MissingQuery)
    }
}

/// Display address for a coordinate-only query
#[must_use]
pub fn coordinate_address(coord: Coordinate) -> String {
    format!("Lat: {}, Lng: {}", coord.lat, coord.lng)
}

/// Decode a site id back into its query
///
/// # Errors
///
/// Returns `SiteError::NotFound` if the id is neither a coordinate pair nor
/// base64 of a non-empty UTF-8 address.
pub fn decode_site_id(id: &str) -> Result<SiteQuery, SiteError> {
    let not_found = || SiteError::NotFound(id.to_string());
    let id = id.trim();
    if id.is_empty() {
        return Err(not_found());
    }

    if let Some((lat, lng)) = id.split_once(',') {
        let lat: f64 = lat.trim().parse().map_err(|_| not_found())?;
        let lng: f64 = lng.trim().parse().map_err(|_| not_found())?;
        // Non-finite components cannot round-trip through JSON
        if !lat.is_finite() || !lng.is_finite() {
            return Err(not_found());
        }
        return Ok(SiteQuery::by_coordinates(lat, lng));
    }

    // Padded standard base64 is accepted as well
    let bytes = URL_SAFE_NO_PAD
        .decode(id)
        .or_else(|_| STANDARD.decode(id))
        .map_err(|_| not_found())?;
    let address = String::from_utf8(bytes).map_err(|_| not_found())?;
    if address.trim().is_empty() {
        return Err(not_found());
    }
    Ok(SiteQuery::by_address(address))
}
