//! Core zoning types
//!
//! This module defines the geometric and record types the resolver works with:
//! - [`Coordinate`]: A latitude/longitude pair
//! - [`BoundingBox`]: An axis-aligned lat/lng box with inclusive edges
//! - [`AreaTest`] / [`AreaPredicate`]: Declarative area tests used by rules
//! - [`ZoningDistrict`]: A fully populated zoning-district record
//! - [`Provenance`]: Which resolution tier produced a record

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A latitude/longitude pair in decimal degrees.
///
/// Any `f64` values are accepted. Out-of-range or non-finite coordinates are
/// valid inputs; they simply never fall inside a region and resolve through
/// the global fallback tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Coordinate carrying no usable location information.
    ///
    /// Used when a caller omits lat/lng entirely.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            lat: f64::NAN,
            lng: f64::NAN,
        }
    }

    /// Check that both components are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Axis-aligned bounding box in lat/lng space.
///
/// A coordinate is inside iff `south <= lat <= north` and
/// `west <= lng <= east`. Edges are inclusive, so two boxes sharing an edge
/// both contain points on that edge; callers resolve such ties by order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Northern (maximum) latitude
    pub north: f64,
    /// Southern (minimum) latitude
    pub south: f64,
    /// Eastern (maximum) longitude
    pub east: f64,
    /// Western (minimum) longitude
    pub west: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges
    #[must_use]
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Check whether the coordinate lies inside the box (edges inclusive).
    ///
    /// NaN components compare false against every edge, so non-finite
    /// coordinates are never inside any box.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.south
            && coord.lat <= self.north
            && coord.lng >= self.west
            && coord.lng <= self.east
    }

    /// Validate edge ordering and finiteness
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidBoundingBox` if any edge is non-finite or
    /// the box is inverted.
    pub fn validate(&self, context: &str) -> Result<(), CatalogError> {
        let edges = [self.north, self.south, self.east, self.west];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(CatalogError::bounding_box(context, "non-finite edge"));
        }
        if self.south > self.north {
            return Err(CatalogError::bounding_box(
                context,
                format!("south {} is above north {}", self.south, self.north),
            ));
        }
        if self.west > self.east {
            return Err(CatalogError::bounding_box(
                context,
                format!("west {} is east of east {}", self.west, self.east),
            ));
        }
        Ok(())
    }
}

/// A single area test.
///
/// Bands are unbounded in the other axis, which is how corridors along a
/// road or "north of" splits are expressed without inventing fake edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AreaTest {
    /// Inside a bounding box
    Within(BoundingBox),

    /// `south <= lat <= north`, any longitude
    LatitudeBand { south: f64, north: f64 },

    /// `west <= lng <= east`, any latitude
    LongitudeBand { west: f64, east: f64 },

    /// `lat >= lat`
    NorthOf { lat: f64 },

    /// `lat <= lat`
    SouthOf { lat: f64 },
}

impl AreaTest {
    /// Evaluate the test against a coordinate
    #[must_use]
    pub fn matches(&self, coord: Coordinate) -> bool {
        match *self {
            Self::Within(bbox) => bbox.contains(coord),
            Self::LatitudeBand { south, north } => coord.lat >= south && coord.lat <= north,
            Self::LongitudeBand { west, east } => coord.lng >= west && coord.lng <= east,
            Self::NorthOf { lat } => coord.lat >= lat,
            Self::SouthOf { lat } => coord.lat <= lat,
        }
    }

    fn validate(&self, context: &str) -> Result<(), CatalogError> {
        match *self {
            Self::Within(bbox) => bbox.validate(context),
            Self::LatitudeBand { south, north } => {
                if !south.is_finite() || !north.is_finite() || south > north {
                    return Err(CatalogError::bounding_box(
                        context,
                        format!("invalid latitude band {south}..{north}"),
                    ));
                }
                Ok(())
            }
            Self::LongitudeBand { west, east } => {
                if !west.is_finite() || !east.is_finite() || west > east {
                    return Err(CatalogError::bounding_box(
                        context,
                        format!("invalid longitude band {west}..{east}"),
                    ));
                }
                Ok(())
            }
            Self::NorthOf { lat } | Self::SouthOf { lat } => {
                if !lat.is_finite() {
                    return Err(CatalogError::bounding_box(context, "non-finite latitude"));
                }
                Ok(())
            }
        }
    }
}

impl From<BoundingBox> for AreaTest {
    fn from(bbox: BoundingBox) -> Self {
        Self::Within(bbox)
    }
}

/// Conjunction of area tests.
///
/// A predicate matches when every test matches. An empty predicate would
/// match everything, so catalog validation rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaPredicate(Vec<AreaTest>);

impl AreaPredicate {
    /// Create a predicate from a list of tests
    #[must_use]
    pub fn new(tests: Vec<AreaTest>) -> Self {
        Self(tests)
    }

    /// Predicate made of a single bounding box
    #[must_use]
    pub fn within(bbox: BoundingBox) -> Self {
        Self(vec![AreaTest::Within(bbox)])
    }

    /// Add another test to the conjunction
    #[must_use]
    pub fn and(mut self, test: impl Into<AreaTest>) -> Self {
        self.0.push(test.into());
        self
    }

    /// Evaluate all tests against the coordinate
    #[must_use]
    pub fn matches(&self, coord: Coordinate) -> bool {
        self.0.iter().all(|test| test.matches(coord))
    }

    /// Get the tests in this predicate
    #[must_use]
    pub fn tests(&self) -> &[AreaTest] {
        &self.0
    }

    /// Validate every test and reject empty predicates
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the predicate is empty or any test is malformed.
    pub fn validate(&self, context: &str) -> Result<(), CatalogError> {
        if self.0.is_empty() {
            return Err(CatalogError::EmptyPredicate(context.to_string()));
        }
        for test in &self.0 {
            test.validate(context)?;
        }
        Ok(())
    }
}

impl From<AreaTest> for AreaPredicate {
    fn from(test: AreaTest) -> Self {
        Self(vec![test])
    }
}

/// Required setbacks from lot lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setbacks {
    /// Front setback (e.g. "20 ft")
    pub front: String,
    /// Side setback
    pub side: String,
    /// Rear setback
    pub rear: String,
}

impl Setbacks {
    /// Create setbacks from front, side, and rear distances
    pub fn new(front: impl Into<String>, side: impl Into<String>, rear: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            side: side.into(),
            rear: rear.into(),
        }
    }
}

/// A resolved zoning-district record.
///
/// Records are literal, fully populated values; the resolver hands out clones
/// and never edits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningDistrict {
    /// District code (e.g. "B4", "R-1B")
    pub district: String,
    /// Human-readable description
    pub description: String,
    /// Maximum building height (e.g. "80 ft")
    pub max_height: String,
    /// Floor area ratio
    pub far: f64,
    /// Required setbacks
    pub setbacks: Setbacks,
    /// Permitted uses, in display order
    pub allowed_uses: Vec<String>,
    /// Parking requirement summary
    pub parking_requirements: String,
    /// Overlay districts, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays: Option<BTreeSet<String>>,
    /// Where this record came from (ordinance name or mock marker)
    pub source: String,
}

impl ZoningDistrict {
    /// Create a district record without overlays
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        district: impl Into<String>,
        description: impl Into<String>,
        max_height: impl Into<String>,
        far: f64,
        setbacks: Setbacks,
        allowed_uses: &[&str],
        parking_requirements: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            description: description.into(),
            max_height: max_height.into(),
            far,
            setbacks,
            allowed_uses: allowed_uses.iter().map(|s| (*s).to_string()).collect(),
            parking_requirements: parking_requirements.into(),
            overlays: None,
            source: source.into(),
        }
    }

    /// Attach overlay districts
    #[must_use]
    pub fn with_overlays(mut self, overlays: &[&str]) -> Self {
        self.overlays = Some(overlays.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Check that every required field carries a value
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::IncompleteDistrict` naming the first empty field.
    pub fn validate(&self, context: &str) -> Result<(), CatalogError> {
        let required = [
            ("district", &self.district),
            ("description", &self.description),
            ("maxHeight", &self.max_height),
            ("parkingRequirements", &self.parking_requirements),
            ("source", &self.source),
            ("setbacks.front", &self.setbacks.front),
            ("setbacks.side", &self.setbacks.side),
            ("setbacks.rear", &self.setbacks.rear),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CatalogError::incomplete(
                    context,
                    format!("{field} is empty"),
                ));
            }
        }
        if !self.far.is_finite() || self.far < 0.0 {
            return Err(CatalogError::incomplete(
                context,
                format!("far {} is not a non-negative number", self.far),
            ));
        }
        if self.allowed_uses.is_empty() {
            return Err(CatalogError::incomplete(context, "allowedUses is empty"));
        }
        Ok(())
    }
}

/// Which tier of the resolver produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// A locality rule or locality default matched
    Locality,
    /// Inside a region but no named locality; region palette used
    RegionGeneric,
    /// Outside every region (or unusable coordinate); global palette used
    GlobalGeneric,
}

impl Provenance {
    /// Check if the record was synthesized from a palette
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::RegionGeneric | Self::GlobalGeneric)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locality => write!(f, "locality"),
            Self::RegionGeneric => write!(f, "region_generic"),
            Self::GlobalGeneric => write!(f, "global_generic"),
        }
    }
}
