//! Zoning resolver with hot-reload support.
//!
//! The resolver walks a strict three-tier fallback chain:
//!
//! ```text
//! coord -> match_region ──none──> global palette          (GlobalGeneric)
//!               │
//!             some
//!               │
//!          match_locality ──none──> region palette        (RegionGeneric)
//!               │
//!             some
//!               │
//!          locality rules ──none──> locality default      (Locality)
//! ```
//!
//! Every tier ends in a total default, so resolution never fails.
//!
//! The catalog lives behind an `ArcSwap`: reads are lock-free and a new
//! catalog can be swapped in without blocking resolutions in flight.
//!
//! # Example
//!
//! ```
//! use site_scout::zoning::{Coordinate, Provenance, ZoningResolver};
//!
//! let resolver = ZoningResolver::builtin();
//!
//! let district = resolver.resolve(Coordinate::new(42.33, -83.045));
//! assert_eq!(district.district, "B4");
//!
//! let detailed = resolver.resolve_detailed(Coordinate::new(0.0, 0.0));
//! assert_eq!(detailed.provenance, Provenance::GlobalGeneric);
//! assert_eq!(detailed.district.source, "Mock Data");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::RegionCatalog;
use super::regulations::ZoningRegulations;
use super::types::{Coordinate, Provenance, ZoningDistrict};

/// Result of a detailed resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The selected district
    pub district: ZoningDistrict,
    /// Which tier produced it
    pub provenance: Provenance,
    /// Matched region, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Matched locality, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// Label of the locality rule that matched; `None` for defaults and palettes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Resolution {
    /// Check if the record came from a locality default rather than a rule
    #[must_use]
    pub fn is_locality_default(&self) -> bool {
        self.provenance == Provenance::Locality && self.rule.is_none()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.district.district, self.provenance)?;
        if let Some(region) = &self.region {
            write!(f, ":{region}")?;
        }
        if let Some(locality) = &self.locality {
            write!(f, "/{locality}")?;
        }
        if let Some(rule) = &self.rule {
            write!(f, "#{rule}")?;
        }
        write!(f, ")")
    }
}

/// Hot-reloadable zoning resolver.
///
/// Safe to share across threads; every resolution method is a pure
/// function of the coordinate and the current catalog.
pub struct ZoningResolver {
    catalog: ArcSwap<RegionCatalog>,
    version: AtomicU64,
}

impl fmt::Debug for ZoningResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.catalog.load();
        f.debug_struct("ZoningResolver")
            .field("regions", &catalog.regions.len())
            .field("localities", &catalog.locality_count())
            .field("version", &self.version())
            .finish()
    }
}

impl Default for ZoningResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ZoningResolver {
    /// Create a resolver over a validated catalog
    #[must_use]
    pub fn new(catalog: RegionCatalog) -> Self {
        Self {
            catalog: ArcSwap::from_pointee(catalog),
            version: AtomicU64::new(1),
        }
    }

    /// Resolver over the builtin catalog
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(RegionCatalog::builtin())
    }

    /// Current catalog (lock-free read)
    pub fn catalog(&self) -> Guard<Arc<RegionCatalog>> {
        self.catalog.load()
    }

    /// Swap in a new catalog. Resolutions already running finish on the old one.
    pub fn reload(&self, catalog: RegionCatalog) -> u64 {
        self.catalog.store(Arc::new(catalog));
        self.version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Catalog version, incremented on each reload
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    /// Resolve a coordinate to exactly one district
    #[must_use]
    pub fn resolve(&self, coord: Coordinate) -> ZoningDistrict {
        self.resolve_detailed(coord).district
    }

    /// Resolve a coordinate and report which tier produced the record
    #[must_use]
    pub fn resolve_detailed(&self, coord: Coordinate) -> Resolution {
        let catalog = self.catalog.load();
        Self::resolve_with_catalog(&catalog, coord)
    }

    /// Resolve against a specific catalog (for batch processing)
    #[must_use]
    pub fn resolve_with_catalog(catalog: &RegionCatalog, coord: Coordinate) -> Resolution {
        // Tier 1: region
        let Some(region) = catalog.region_matcher().match_region(coord) else {
            let district = catalog.global_palette.select(coord).clone();
            debug!(%coord, district = %district.district, "resolved from global palette");
            return Resolution {
                district,
                provenance: Provenance::GlobalGeneric,
                region: None,
                locality: None,
                rule: None,
            };
        };

        // Tier 2: locality within the region
        if let Some(rules) = region
            .match_locality(coord)
            .and_then(|name| region.locality(name))
        {
            let matched = rules.evaluate(coord);
            let district = matched.district().clone();
            debug!(
                %coord,
                region = %region.name,
                locality = %rules.name,
                district = %district.district,
                "resolved from locality rules"
            );
            return Resolution {
                district,
                provenance: Provenance::Locality,
                region: Some(region.name.clone()),
                locality: Some(rules.name.clone()),
                rule: matched.label().map(str::to_string),
            };
        }

        // Tier 3: region palette
        let district = region.resolve_generic(coord).clone();
        debug!(
            %coord,
            region = %region.name,
            district = %district.district,
            "resolved from region palette"
        );
        Resolution {
            district,
            provenance: Provenance::RegionGeneric,
            region: Some(region.name.clone()),
            locality: None,
            rule: None,
        }
    }

    /// Archetype from the global palette, ignoring regions
    #[must_use]
    pub fn resolve_generic_global(&self, coord: Coordinate) -> ZoningDistrict {
        self.catalog.load().global_palette.select(coord).clone()
    }

    /// Regulations summary for a district code, if any catalog entry uses it
    #[must_use]
    pub fn regulations(&self, zone_id: &str) -> Option<ZoningRegulations> {
        self.catalog
            .load()
            .find_district(zone_id)
            .map(ZoningRegulations::from_district)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoning::palette::global_palette;

    #[test]
    fn test_downtown_detroit() {
        let resolver = ZoningResolver::builtin();
        let result = resolver.resolve_detailed(Coordinate::new(42.33, -83.045));
        assert_eq!(result.district.district, "B4");
        assert_eq!(result.provenance, Provenance::Locality);
        assert_eq!(result.region.as_deref(), Some("Michigan"));
        assert_eq!(result.locality.as_deref(), Some("Detroit"));
        assert_eq!(result.rule.as_deref(), Some("downtown"));
        assert_eq!(result.to_string(), "B4 (locality:Michigan/Detroit#downtown)");
    }

    #[test]
    fn test_locality_default() {
        let resolver = ZoningResolver::builtin();
        let result = resolver.resolve_detailed(Coordinate::new(42.40, -83.10));
        assert_eq!(result.district.district, "R1");
        assert!(result.is_locality_default());
    }

    #[test]
    fn test_region_generic() {
        let resolver = ZoningResolver::builtin();
        // Northern lower peninsula, no named city
        let result = resolver.resolve_detailed(Coordinate::new(44.5, -85.0));
        assert_eq!(result.provenance, Provenance::RegionGeneric);
        assert_eq!(result.district.source, "Michigan Zoning (Mock)");
        assert!(result.locality.is_none());
        // floor(44500 - 85000) = -40500, rem_euclid 5 = 0
        assert_eq!(result.district.district, "R-1");
    }

    #[test]
    fn test_global_generic() {
        let resolver = ZoningResolver::builtin();
        for coord in [
            Coordinate::new(0.0, 0.0),
            Coordinate::unknown(),
            Coordinate::new(90.0, 180.0),
            Coordinate::new(f64::INFINITY, 0.0),
        ] {
            let result = resolver.resolve_detailed(coord);
            assert_eq!(result.provenance, Provenance::GlobalGeneric);
            assert_eq!(result.district.source, "Mock Data");
            assert!(result.region.is_none());
        }
    }

    #[test]
    fn test_generic_global_ignores_regions() {
        let resolver = ZoningResolver::builtin();
        let district = resolver.resolve_generic_global(Coordinate::new(42.33, -83.045));
        assert_eq!(district.source, "Mock Data");
    }

    #[test]
    fn test_deterministic() {
        let resolver = ZoningResolver::builtin();
        let coord = Coordinate::new(42.9612, -85.6557);
        let first = resolver.resolve_detailed(coord);
        for _ in 0..10 {
            assert_eq!(resolver.resolve_detailed(coord), first);
        }
    }

    #[test]
    fn test_reload() {
        let resolver = ZoningResolver::builtin();
        assert_eq!(resolver.version(), 1);

        let empty = RegionCatalog {
            regions: Vec::new(),
            global_palette: global_palette(),
        };
        assert_eq!(resolver.reload(empty), 2);
        assert_eq!(resolver.version(), 2);

        let result = resolver.resolve_detailed(Coordinate::new(42.33, -83.045));
        assert_eq!(result.provenance, Provenance::GlobalGeneric);
    }

    #[test]
    fn test_regulations_lookup() {
        let resolver = ZoningResolver::builtin();
        let regs = resolver.regulations("B4").unwrap();
        assert_eq!(regs.id, "B4");
        assert!(resolver.regulations("nope").is_none());
    }
}
