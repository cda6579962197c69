//! Zoning resolution integration tests
//!
//! Exercises the resolver against the builtin catalog, catalogs loaded from
//! files, and catalogs swapped in while resolutions are running.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use tempfile::NamedTempFile;

use site_scout::zoning::{
    coordinate_key, Coordinate, DistrictPalette, Provenance, RegionCatalog, Setbacks,
    ZoningDistrict, ZoningResolver, GLOBAL_PALETTE_SOURCE,
};
use site_scout::CatalogError;

// ============================================================================
// Test Helpers
// ============================================================================

fn flat_catalog(code: &str) -> RegionCatalog {
    let district = ZoningDistrict::new(
        code,
        "Flat test district",
        "40 ft",
        1.0,
        Setbacks::new("10 ft", "5 ft", "10 ft"),
        &["Anything"],
        "None",
        "Test Catalog",
    );
    RegionCatalog {
        regions: Vec::new(),
        global_palette: DistrictPalette::new("flat", vec![district]).unwrap(),
    }
}

fn write_catalog(catalog: &RegionCatalog) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(catalog).unwrap().as_bytes())
        .unwrap();
    file
}

// ============================================================================
// Tier Tests
// ============================================================================

#[test]
fn test_every_tier_is_reachable() {
    let resolver = ZoningResolver::builtin();

    let locality = resolver.resolve_detailed(Coordinate::new(42.33, -83.045));
    assert_eq!(locality.provenance, Provenance::Locality);

    let region = resolver.resolve_detailed(Coordinate::new(44.0, -85.0));
    assert_eq!(region.provenance, Provenance::RegionGeneric);
    assert_eq!(region.region.as_deref(), Some("Michigan"));
    assert!(region.locality.is_none());

    let global = resolver.resolve_detailed(Coordinate::new(51.5, -0.12));
    assert_eq!(global.provenance, Provenance::GlobalGeneric);
    assert_eq!(global.district.source, GLOBAL_PALETTE_SOURCE);
    assert!(global.region.is_none());
}

#[test]
fn test_unusable_coordinates_resolve_globally() {
    let resolver = ZoningResolver::builtin();
    for coord in [
        Coordinate::unknown(),
        Coordinate::new(f64::INFINITY, 0.0),
        Coordinate::new(0.0, f64::NEG_INFINITY),
    ] {
        let resolution = resolver.resolve_detailed(coord);
        assert_eq!(resolution.provenance, Provenance::GlobalGeneric, "{coord}");
    }
}

#[test]
fn test_palette_selection_tracks_key() {
    let resolver = ZoningResolver::builtin();
    let catalog = resolver.catalog();
    let codes: Vec<&str> = catalog
        .global_palette
        .districts()
        .iter()
        .map(|d| d.district.as_str())
        .collect();

    // Exact binary fractions keep the key free of rounding
    for step in -6_i32..6 {
        let lat = f64::from(step) / 1024.0 * 1.5;
        let coord = Coordinate::new(lat, 0.0);
        let key = coordinate_key(coord);
        let expected = codes[usize::try_from(key.rem_euclid(5)).unwrap()];
        assert_eq!(resolver.resolve(coord).district, expected, "lat {lat}");
    }
}

#[test]
fn test_regulations_for_catalog_codes() {
    let resolver = ZoningResolver::builtin();

    let b4 = resolver.regulations("B4").unwrap();
    assert_eq!(b4.id, "B4");

    // Palette archetypes are searchable too
    assert!(resolver.regulations("R6").is_some());
    assert!(resolver.regulations("R-2").is_some());
    assert!(resolver.regulations("NOPE").is_none());
}

// ============================================================================
// Catalog File Tests
// ============================================================================

#[test]
fn test_catalog_file_replaces_builtin() {
    let file = write_catalog(&flat_catalog("FLAT"));
    let catalog = RegionCatalog::load(file.path()).unwrap();
    let resolver = ZoningResolver::new(catalog);

    // Detroit is no longer a known region
    let resolution = resolver.resolve_detailed(Coordinate::new(42.33, -83.045));
    assert_eq!(resolution.provenance, Provenance::GlobalGeneric);
    assert_eq!(resolution.district.district, "FLAT");
}

#[test]
fn test_invalid_catalog_file_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"regions": [], "globalPalette": {"name": "x", "districts": []}}"#)
        .unwrap();
    assert!(RegionCatalog::load(file.path()).is_err());

    let missing = RegionCatalog::load("/nonexistent/catalog.json");
    assert!(matches!(missing, Err(CatalogError::LoadError { .. })));
}

// ============================================================================
// Hot Reload Tests
// ============================================================================

#[test]
fn test_reload_swaps_catalog() {
    let resolver = ZoningResolver::builtin();
    let coord = Coordinate::new(42.40, -83.10);
    assert_eq!(resolver.resolve(coord).district, "R1");
    assert_eq!(resolver.version(), 1);

    assert_eq!(resolver.reload(flat_catalog("FLAT")), 2);
    assert_eq!(resolver.resolve(coord).district, "FLAT");

    assert_eq!(resolver.reload(RegionCatalog::builtin()), 3);
    assert_eq!(resolver.resolve(coord).district, "R1");
}

#[test]
fn test_concurrent_resolution_during_reload() {
    let resolver = Arc::new(ZoningResolver::builtin());
    let coord = Coordinate::new(42.33, -83.045);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let district = resolver.resolve(coord).district;
                    // Each resolution sees one whole catalog or the other
                    assert!(district == "B4" || district == "FLAT", "got {district}");
                }
            })
        })
        .collect();

    for i in 0..50 {
        if i % 2 == 0 {
            resolver.reload(flat_catalog("FLAT"));
        } else {
            resolver.reload(RegionCatalog::builtin());
        }
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(resolver.version(), 51);
}
