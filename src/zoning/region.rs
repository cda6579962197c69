//! Region and locality matching
//!
//! A [`Region`] is a macro-level jurisdiction (a state) with a bounding box,
//! an ordered list of locality boundaries, the rule sets for those
//! localities, and a generic palette for points inside the region that fall
//! in no named locality.
//!
//! Both region and locality lookups are first-match-wins in declaration
//! order. Boundaries may nest and overlap.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::district::LocalityRules;
use super::palette::DistrictPalette;
use super::types::{AreaPredicate, BoundingBox, Coordinate, ZoningDistrict};
use crate::error::CatalogError;

/// Boundary test mapping an area to a locality name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityBoundary {
    /// Name of the locality this boundary selects
    pub locality: String,
    /// Area covered by the locality
    pub area: AreaPredicate,
}

impl LocalityBoundary {
    /// Create a boundary
    pub fn new(locality: impl Into<String>, area: impl Into<AreaPredicate>) -> Self {
        Self {
            locality: locality.into(),
            area: area.into(),
        }
    }
}

/// A macro-region with its localities and generic fallback palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Region name (e.g. "Michigan")
    pub name: String,
    /// Outer bounding box
    pub bounding_box: BoundingBox,
    /// Locality boundaries in match order
    #[serde(default)]
    pub locality_boundaries: Vec<LocalityBoundary>,
    /// Rule sets, one per locality
    #[serde(default)]
    pub localities: Vec<LocalityRules>,
    /// Palette used inside the region when no locality matches
    pub generic_fallback: DistrictPalette,
}

impl Region {
    /// Check whether the coordinate is inside the region's bounding box
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.bounding_box.contains(coord)
    }

    /// Name of the first locality whose boundary contains the coordinate.
    ///
    /// The coordinate is not checked against the region box; callers reach
    /// this through [`RegionMatcher::match_region`].
    #[must_use]
    pub fn match_locality(&self, coord: Coordinate) -> Option<&str> {
        self.locality_boundaries
            .iter()
            .find(|boundary| boundary.area.matches(coord))
            .map(|boundary| boundary.locality.as_str())
    }

    /// Rule set for a locality name
    #[must_use]
    pub fn locality(&self, name: &str) -> Option<&LocalityRules> {
        self.localities.iter().find(|l| l.name == name)
    }

    /// Synthesize a district from the region palette
    #[must_use]
    pub fn resolve_generic(&self, coord: Coordinate) -> &ZoningDistrict {
        self.generic_fallback.select(coord)
    }

    /// Validate boxes, names, references and district records
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName("region".into()));
        }
        self.bounding_box.validate(&format!("region {}", self.name))?;

        let mut seen = HashSet::new();
        for locality in &self.localities {
            if !seen.insert(locality.name.as_str()) {
                return Err(CatalogError::DuplicateLocality {
                    region: self.name.clone(),
                    locality: locality.name.clone(),
                });
            }
            locality.validate(&self.name)?;
        }

        for boundary in &self.locality_boundaries {
            boundary
                .area
                .validate(&format!("{} boundary {}", self.name, boundary.locality))?;
            if !seen.contains(boundary.locality.as_str()) {
                return Err(CatalogError::UnknownLocality {
                    region: self.name.clone(),
                    locality: boundary.locality.clone(),
                });
            }
        }

        self.generic_fallback.validate()
    }
}

/// First-match-wins lookup over an ordered list of regions
#[derive(Debug, Clone, Copy)]
pub struct RegionMatcher<'a> {
    regions: &'a [Region],
}

impl<'a> RegionMatcher<'a> {
    /// Create a matcher over regions in registration order
    #[must_use]
    pub const fn new(regions: &'a [Region]) -> Self {
        Self { regions }
    }

    /// First region whose bounding box contains the coordinate
    #[must_use]
    pub fn match_region(&self, coord: Coordinate) -> Option<&'a Region> {
        self.regions.iter().find(|region| region.contains(coord))
    }

    /// First locality in `region` containing the coordinate
    #[must_use]
    pub fn match_locality(region: &'a Region, coord: Coordinate) -> Option<&'a str> {
        region.match_locality(coord)
    }

    /// Number of registered regions
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if no regions are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoning::palette::global_palette;
    use crate::zoning::types::{AreaTest, Setbacks};

    fn district(code: &str) -> ZoningDistrict {
        ZoningDistrict::new(
            code,
            "Test District",
            "30 ft",
            1.0,
            Setbacks::new("10 ft", "5 ft", "20 ft"),
            &["Office"],
            "1 space per 300 sq ft",
            "Test Ordinance (Mock)",
        )
    }

    fn region(name: &str, bbox: BoundingBox) -> Region {
        Region {
            name: name.into(),
            bounding_box: bbox,
            locality_boundaries: vec![
                LocalityBoundary::new(
                    "Heights",
                    AreaPredicate::within(BoundingBox::new(1.0, 0.0, 1.0, 0.0))
                        .and(AreaTest::NorthOf { lat: 0.5 }),
                ),
                LocalityBoundary::new(
                    "Lowlands",
                    AreaPredicate::within(BoundingBox::new(1.0, 0.0, 1.0, 0.0)),
                ),
            ],
            localities: vec![
                LocalityRules::new("Heights", district("H")),
                LocalityRules::new("Lowlands", district("L")),
            ],
            generic_fallback: global_palette(),
        }
    }

    #[test]
    fn test_match_region_in_order() {
        let regions = vec![
            region("First", BoundingBox::new(10.0, -10.0, 10.0, -10.0)),
            region("Second", BoundingBox::new(20.0, -20.0, 20.0, -20.0)),
        ];
        let matcher = RegionMatcher::new(&regions);
        assert_eq!(matcher.len(), 2);

        let hit = matcher.match_region(Coordinate::new(5.0, 5.0));
        assert_eq!(hit.map(|r| r.name.as_str()), Some("First"));

        let hit = matcher.match_region(Coordinate::new(15.0, 15.0));
        assert_eq!(hit.map(|r| r.name.as_str()), Some("Second"));

        assert!(matcher.match_region(Coordinate::new(50.0, 50.0)).is_none());
        assert!(matcher.match_region(Coordinate::unknown()).is_none());
    }

    #[test]
    fn test_nested_locality_split() {
        let r = region("Test", BoundingBox::new(10.0, -10.0, 10.0, -10.0));
        assert_eq!(r.match_locality(Coordinate::new(0.7, 0.5)), Some("Heights"));
        assert_eq!(r.match_locality(Coordinate::new(0.5, 0.5)), Some("Heights"));
        assert_eq!(r.match_locality(Coordinate::new(0.3, 0.5)), Some("Lowlands"));
        assert_eq!(r.match_locality(Coordinate::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_locality_lookup() {
        let r = region("Test", BoundingBox::new(10.0, -10.0, 10.0, -10.0));
        assert_eq!(r.locality("Heights").map(|l| l.default.district.as_str()), Some("H"));
        assert!(r.locality("Nowhere").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_locality() {
        let mut r = region("Test", BoundingBox::new(10.0, -10.0, 10.0, -10.0));
        r.localities.push(LocalityRules::new("Heights", district("H2")));
        assert!(matches!(
            r.validate(),
            Err(CatalogError::DuplicateLocality { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_boundary() {
        let mut r = region("Test", BoundingBox::new(10.0, -10.0, 10.0, -10.0));
        r.locality_boundaries.push(LocalityBoundary::new(
            "Ghost Town",
            AreaPredicate::within(BoundingBox::new(2.0, 1.0, 2.0, 1.0)),
        ));
        assert!(matches!(
            r.validate(),
            Err(CatalogError::UnknownLocality { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_region_box() {
        let r = region("Test", BoundingBox::new(-10.0, 10.0, 10.0, -10.0));
        assert!(matches!(
            r.validate(),
            Err(CatalogError::InvalidBoundingBox { .. })
        ));
    }
}
