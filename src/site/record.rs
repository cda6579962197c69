//! Site record assembly
//!
//! A [`SiteRecord`] is the full site-analysis payload: identity, the resolved
//! zoning district, an environmental summary, and design recommendations.
//! Records are built fresh per request and never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::environmental::{
    annual_sun_hours, climate_classification, environment_seed, flood_zone, prevailing_wind,
    soil_type,
};
use crate::zoning::{Coordinate, Provenance, Resolution, ZoningDistrict};

/// Design recommendations; a record carries the first 4 to 7 of these
const RECOMMENDATIONS: [&str; 8] = [
    "Optimize building orientation for solar gain",
    "Consider setback requirements for outdoor spaces",
    "Explore mixed-use development options",
    "Implement rainwater harvesting systems",
    "Utilize passive cooling strategies",
    "Incorporate green roof systems",
    "Design for natural ventilation",
    "Consider geothermal heating/cooling",
];

/// Identity fields of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIdentity {
    /// Stable site id (see [`super::id`])
    pub id: String,
    /// Display address
    pub address: String,
    /// Coordinate used for every lookup
    pub coordinates: Coordinate,
    /// Whether the geocoder fell back to its fixed coordinate
    pub geocode_fallback: bool,
}

/// Short environmental summary embedded in a site record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSummary {
    pub climate: String,
    pub annual_sun_hours: u32,
    pub prevailing_winds: String,
    pub flood_zone: String,
    pub soil_type: String,
}

/// Provider of coordinate-derived environmental data
///
/// Implementations must be deterministic: the same coordinate yields the
/// same summary and recommendations.
pub trait EnvironmentalSource: Send + Sync + fmt::Debug {
    /// Environmental summary for a coordinate
    fn summarize(&self, coord: Coordinate) -> EnvironmentalSummary;

    /// Design recommendations for a coordinate
    fn recommendations(&self, coord: Coordinate) -> Vec<String>;
}

/// Palette-based environmental source keyed by the coordinate seed
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededEnvironment;

impl EnvironmentalSource for SeededEnvironment {
    fn summarize(&self, coord: Coordinate) -> EnvironmentalSummary {
        let seed = environment_seed(coord);
        EnvironmentalSummary {
            climate: climate_classification(seed).to_string(),
            annual_sun_hours: annual_sun_hours(seed),
            prevailing_winds: prevailing_wind(seed).to_string(),
            flood_zone: flood_zone(seed).to_string(),
            soil_type: soil_type(seed).to_string(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn recommendations(&self, coord: Coordinate) -> Vec<String> {
        let count = 4 + (environment_seed(coord) % 4) as usize;
        RECOMMENDATIONS[..count]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}

/// Full site-analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    #[serde(flatten)]
    pub identity: SiteIdentity,
    pub zoning: ZoningDistrict,
    /// Resolver tier that produced `zoning`
    pub zoning_provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    pub environmental: EnvironmentalSummary,
    pub recommendations: Vec<String>,
}

impl SiteRecord {
    /// Site id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.identity.id
    }
}

/// Assembles site records from a resolution and an environmental source
#[derive(Debug, Clone)]
pub struct SiteRecordBuilder {
    environment: Arc<dyn EnvironmentalSource>,
}

impl Default for SiteRecordBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SeededEnvironment))
    }
}

impl SiteRecordBuilder {
    /// Create a builder over an environmental source
    #[must_use]
    pub fn new(environment: Arc<dyn EnvironmentalSource>) -> Self {
        Self { environment }
    }

    /// Assemble a record. Pure: no I/O, same inputs give the same record.
    #[must_use]
    pub fn build(&self, identity: SiteIdentity, coord: Coordinate, zoning: Resolution) -> SiteRecord {
        let Resolution {
            district,
            provenance,
            region,
            locality,
            ..
        } = zoning;

        SiteRecord {
            identity,
            zoning: district,
            zoning_provenance: provenance,
            region,
            locality,
            environmental: self.environment.summarize(coord),
            recommendations: self.environment.recommendations(coord),
        }
    }
}
