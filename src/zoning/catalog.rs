//! Region catalog
//!
//! The catalog is the declarative data the resolver runs on: the ordered
//! list of regions and the global archetype palette. The builtin catalog
//! ships the Michigan region; a JSON file with the same shape can replace it.
//!
//! # File Format
//!
//! ```json
//! {
//!   "regions": [
//!     {
//!       "name": "Michigan",
//!       "boundingBox": { "north": 48.3, "south": 41.7, "east": -82.1, "west": -90.4 },
//!       "localityBoundaries": [
//!         { "locality": "Detroit", "area": [{ "type": "within", "north": 42.45, ... }] }
//!       ],
//!       "localities": [ { "name": "Detroit", "rules": [...], "default": {...} } ],
//!       "genericFallback": { "name": "michigan", "districts": [...] }
//!     }
//!   ],
//!   "globalPalette": { "name": "global", "districts": [...] }
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::michigan::michigan;
use super::palette::{global_palette, DistrictPalette};
use super::region::{Region, RegionMatcher};
use super::types::ZoningDistrict;
use crate::error::CatalogError;

/// Ordered regions plus the global fallback palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCatalog {
    /// Regions in registration order
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Palette for coordinates outside every region
    pub global_palette: DistrictPalette,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionCatalog {
    /// Catalog with the builtin Michigan region and global palette
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            regions: vec![michigan()],
            global_palette: global_palette(),
        }
    }

    /// Load and validate a catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LoadError` if the file cannot be read, or a
    /// parse/validation error for bad content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CatalogError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded zoning catalog from {}: {} regions, {} localities",
            path.display(),
            catalog.regions.len(),
            catalog.locality_count()
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON text
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for malformed JSON or a validation
    /// error for inconsistent content.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(content).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate every region and the global palette
    ///
    /// # Errors
    ///
    /// Returns the first problem found: duplicate or empty names, malformed
    /// boxes, dangling locality references, empty palettes or predicates,
    /// and incomplete district records.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for region in &self.regions {
            if !names.insert(region.name.as_str()) {
                return Err(CatalogError::DuplicateRegion(region.name.clone()));
            }
            region.validate()?;
        }
        self.global_palette.validate()
    }

    /// Region matcher over this catalog's regions
    #[must_use]
    pub fn region_matcher(&self) -> RegionMatcher<'_> {
        RegionMatcher::new(&self.regions)
    }

    /// Region by name
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Total number of localities across all regions
    #[must_use]
    pub fn locality_count(&self) -> usize {
        self.regions.iter().map(|r| r.localities.len()).sum()
    }

    /// First district with the given code.
    ///
    /// Search order: each region's localities in order (rules then
    /// default), then that region's palette, then the global palette.
    #[must_use]
    pub fn find_district(&self, code: &str) -> Option<&ZoningDistrict> {
        self.regions
            .iter()
            .find_map(|region| {
                region
                    .localities
                    .iter()
                    .find_map(|locality| locality.find(code))
                    .or_else(|| region.generic_fallback.find(code))
            })
            .or_else(|| self.global_palette.find(code))
    }
}
