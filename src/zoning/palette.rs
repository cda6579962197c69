//! Deterministic archetype palettes
//!
//! When no explicit rule covers a coordinate, the resolver synthesizes a
//! district by picking one entry from a small palette of archetypes. The
//! pick is keyed by [`coordinate_key`], so the same coordinate always yields
//! the same archetype.

use serde::{Deserialize, Serialize};

use super::types::{Coordinate, Setbacks, ZoningDistrict};
use crate::error::CatalogError;

/// Source marker for records drawn from the global palette
pub const GLOBAL_PALETTE_SOURCE: &str = "Mock Data";

/// Selection key for a coordinate: `floor(lat*1000 + lng*1000)`.
///
/// Non-finite inputs collapse to a fixed key (NaN casts to 0, infinities
/// saturate), so selection stays total for every input.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coordinate_key(coord: Coordinate) -> i64 {
    (coord.lat * 1000.0 + coord.lng * 1000.0).floor() as i64
}

/// Non-empty, ordered set of archetype districts.
///
/// Construction rejects empty palettes, so [`DistrictPalette::select`] always
/// has something to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPalette")]
pub struct DistrictPalette {
    name: String,
    districts: Vec<ZoningDistrict>,
}

#[derive(Deserialize)]
struct RawPalette {
    name: String,
    districts: Vec<ZoningDistrict>,
}

impl TryFrom<RawPalette> for DistrictPalette {
    type Error = CatalogError;

    fn try_from(raw: RawPalette) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.districts)
    }
}

impl DistrictPalette {
    /// Create a palette
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyPalette` if `districts` is empty.
    pub fn new(name: impl Into<String>, districts: Vec<ZoningDistrict>) -> Result<Self, CatalogError> {
        let name = name.into();
        if districts.is_empty() {
            return Err(CatalogError::EmptyPalette(name));
        }
        Ok(Self { name, districts })
    }

    /// Palette from a literal archetype list
    pub(crate) fn builtin(name: &str, districts: Vec<ZoningDistrict>) -> Self {
        debug_assert!(!districts.is_empty(), "builtin palette {name} is empty");
        Self {
            name: name.into(),
            districts,
        }
    }

    /// Palette name (used in logs and error messages)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All archetypes in selection order
    #[must_use]
    pub fn districts(&self) -> &[ZoningDistrict] {
        &self.districts
    }

    /// Number of archetypes
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Index selected for a coordinate
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn index_for(&self, coord: Coordinate) -> usize {
        coordinate_key(coord).rem_euclid(self.districts.len() as i64) as usize
    }

    /// Pick the archetype for a coordinate
    #[must_use]
    pub fn select(&self, coord: Coordinate) -> &ZoningDistrict {
        &self.districts[self.index_for(coord)]
    }

    /// Find an archetype by district code
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&ZoningDistrict> {
        self.districts.iter().find(|d| d.district == code)
    }

    /// Validate every archetype record
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if any record is incomplete.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName("palette".into()));
        }
        for district in &self.districts {
            district.validate(&format!("palette {} district {}", self.name, district.district))?;
        }
        Ok(())
    }
}

/// Region-agnostic palette used outside every known region.
#[must_use]
pub fn global_palette() -> DistrictPalette {
    let setbacks = || Setbacks::new("10 ft", "5 ft", "30 ft");
    let archetype = |code: &str, description: &str, height: &str, far: f64, uses: &[&str]| {
        ZoningDistrict::new(
            code,
            description,
            height,
            far,
            setbacks(),
            uses,
            "0.5 spaces per dwelling unit",
            GLOBAL_PALETTE_SOURCE,
        )
    };

    DistrictPalette::builtin(
        "global",
        vec![
            archetype(
                "R6",
                "Medium-density residential district",
                "120 ft",
                3.0,
                &["Residential", "Community Facility"],
            ),
            archetype(
                "C2",
                "General commercial district",
                "80 ft",
                6.0,
                &["Commercial", "Residential", "Mixed-Use"],
            ),
            archetype(
                "M1",
                "Light manufacturing district",
                "60 ft",
                5.0,
                &["Manufacturing", "Commercial", "Industrial"],
            ),
            archetype(
                "B3",
                "Central business district",
                "200 ft",
                10.0,
                &["Office", "Retail", "Residential", "Hotel"],
            ),
            archetype(
                "D4",
                "Downtown mixed-use district",
                "150 ft",
                8.0,
                &["Residential", "Office", "Retail", "Entertainment"],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_key() {
        assert_eq!(coordinate_key(Coordinate::new(0.0, 0.0)), 0);
        assert_eq!(coordinate_key(Coordinate::new(0.0015, 0.0)), 1);
        assert_eq!(coordinate_key(Coordinate::new(-0.0005, 0.0)), -1);
        assert_eq!(coordinate_key(Coordinate::unknown()), 0);
        assert_eq!(
            coordinate_key(Coordinate::new(f64::INFINITY, 0.0)),
            i64::MAX
        );
    }

    #[test]
    fn test_select_is_total() {
        let palette = global_palette();
        for coord in [
            Coordinate::new(0.0, 0.0),
            Coordinate::unknown(),
            Coordinate::new(90.0, 180.0),
            Coordinate::new(-90.0, -180.0),
            Coordinate::new(f64::INFINITY, f64::NEG_INFINITY),
        ] {
            assert!(palette.index_for(coord) < palette.len());
        }
    }

    #[test]
    fn test_negative_keys_wrap_into_range() {
        let palette = global_palette();
        // key = floor(-1.0) = -1, rem_euclid 5 = 4
        let coord = Coordinate::new(-0.001, 0.0);
        assert_eq!(palette.index_for(coord), 4);
        assert_eq!(palette.select(coord).district, "D4");
    }

    #[test]
    fn test_origin_selects_first_archetype() {
        let district = global_palette().select(Coordinate::new(0.0, 0.0)).clone();
        assert_eq!(district.district, "R6");
        assert_eq!(district.source, GLOBAL_PALETTE_SOURCE);
        assert_eq!(district.parking_requirements, "0.5 spaces per dwelling unit");
    }

    #[test]
    fn test_empty_palette_rejected() {
        let err = DistrictPalette::new("empty", Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPalette(_)));

        let json = r#"{"name":"empty","districts":[]}"#;
        assert!(serde_json::from_str::<DistrictPalette>(json).is_err());
    }

    #[test]
    fn test_palette_roundtrip_keeps_order() {
        let palette = global_palette();
        let json = serde_json::to_string(&palette).unwrap();
        let parsed: DistrictPalette = serde_json::from_str(&json).unwrap();
        let codes: Vec<_> = parsed.districts().iter().map(|d| d.district.as_str()).collect();
        assert_eq!(codes, ["R6", "C2", "M1", "B3", "D4"]);
    }

    #[test]
    fn test_find() {
        let palette = global_palette();
        assert_eq!(palette.find("B3").map(|d| d.far), Some(10.0));
        assert!(palette.find("ZZ").is_none());
    }
}
