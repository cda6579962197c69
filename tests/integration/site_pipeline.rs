//! Site pipeline integration tests
//!
//! Address in, site record out: geocoding with fallback, zoning, the
//! environmental summary, stable ids and the record cache.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tempfile::NamedTempFile;

use site_scout::config::CacheConfig;
use site_scout::geocode::{FallbackGeocoder, Geocoder, DEFAULT_FALLBACK};
use site_scout::site::{
    EnvironmentalSource, EnvironmentalSummary, SiteCache, SiteQuery, SiteService,
};
use site_scout::zoning::{
    Coordinate, DistrictPalette, Provenance, RegionCatalog, Setbacks, ZoningDistrict,
    ZoningResolver,
};
use site_scout::{GeocodeError, SiteError};

// ============================================================================
// Test Helpers
// ============================================================================

/// Geocoder backed by a fixed address book
#[derive(Debug)]
struct AddressBook(HashMap<&'static str, Coordinate>);

#[async_trait]
impl Geocoder for AddressBook {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.0
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NoResults(address.to_string()))
    }

    fn name(&self) -> &str {
        "address-book"
    }
}

/// Geocoder that never answers in time
#[derive(Debug)]
struct StalledGeocoder;

#[async_trait]
impl Geocoder for StalledGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinate, GeocodeError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Coordinate::new(42.33, -83.045))
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

#[derive(Debug)]
struct ConstantEnvironment;

impl EnvironmentalSource for ConstantEnvironment {
    fn summarize(&self, _coord: Coordinate) -> EnvironmentalSummary {
        EnvironmentalSummary {
            climate: "Test".into(),
            annual_sun_hours: 1234,
            prevailing_winds: "N".into(),
            flood_zone: "Zone X".into(),
            soil_type: "Sand".into(),
        }
    }

    fn recommendations(&self, _coord: Coordinate) -> Vec<String> {
        vec!["Only one".into()]
    }
}

const DETROIT_ADDRESS: &str = "2 Woodward Ave, Detroit, MI";

fn address_book_service() -> SiteService {
    let book = AddressBook(HashMap::from([
        (DETROIT_ADDRESS, Coordinate::new(42.33, -83.045)),
        ("Somewhere in Michigan", Coordinate::new(44.0, -85.0)),
    ]));
    SiteService::new(
        Arc::new(ZoningResolver::builtin()),
        FallbackGeocoder::new(Arc::new(book)),
        SiteCache::new(&CacheConfig::default()),
    )
}

fn flat_catalog_file() -> NamedTempFile {
    let district = ZoningDistrict::new(
        "FLAT",
        "Flat test district",
        "40 ft",
        1.0,
        Setbacks::new("10 ft", "5 ft", "10 ft"),
        &["Anything"],
        "None",
        "Test Catalog",
    );
    let catalog = RegionCatalog {
        regions: Vec::new(),
        global_palette: DistrictPalette::new("flat", vec![district]).unwrap(),
    };
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&catalog).unwrap().as_bytes())
        .unwrap();
    file
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_address_search_builds_full_record() {
    let service = address_book_service();
    let record = service
        .search_site(&SiteQuery::by_address(DETROIT_ADDRESS))
        .await
        .unwrap();

    assert_eq!(record.identity.id, URL_SAFE_NO_PAD.encode(DETROIT_ADDRESS));
    assert_eq!(record.identity.address, DETROIT_ADDRESS);
    assert_eq!(record.identity.coordinates, Coordinate::new(42.33, -83.045));
    assert!(!record.identity.geocode_fallback);

    assert_eq!(record.zoning.district, "B4");
    assert_eq!(record.zoning_provenance, Provenance::Locality);
    assert_eq!(record.region.as_deref(), Some("Michigan"));
    assert_eq!(record.locality.as_deref(), Some("Detroit"));

    assert!((4..=8).contains(&record.recommendations.len()));
}

#[tokio::test]
async fn test_region_generic_record() {
    let service = address_book_service();
    let record = service
        .search_site(&SiteQuery::by_address("Somewhere in Michigan"))
        .await
        .unwrap();

    assert_eq!(record.zoning.district, "R-1");
    assert_eq!(record.zoning_provenance, Provenance::RegionGeneric);
    assert!(record.locality.is_none());
}

#[tokio::test]
async fn test_unknown_address_uses_fallback_coordinate() {
    let service = address_book_service();
    let record = service
        .search_site(&SiteQuery::by_address("1 Nowhere Lane"))
        .await
        .unwrap();

    assert!(record.identity.geocode_fallback);
    assert_eq!(record.identity.coordinates, DEFAULT_FALLBACK);
    assert_eq!(record.zoning_provenance, Provenance::GlobalGeneric);
}

#[tokio::test]
async fn test_stalled_geocoder_hits_deadline() {
    let geocoder = FallbackGeocoder::new(Arc::new(StalledGeocoder))
        .with_deadline(Duration::from_millis(50))
        .with_fallback(Coordinate::new(42.40, -83.10));
    let service = SiteService::new(
        Arc::new(ZoningResolver::builtin()),
        geocoder,
        SiteCache::disabled(),
    );

    let record = service
        .search_site(&SiteQuery::by_address("anything"))
        .await
        .unwrap();
    assert!(record.identity.geocode_fallback);
    assert_eq!(record.zoning.district, "R1");
}

#[tokio::test]
async fn test_coordinate_search() {
    let service = address_book_service();
    let record = service
        .search_site(&SiteQuery::by_coordinates(42.40, -83.10))
        .await
        .unwrap();

    assert_eq!(record.identity.id, "42.4,-83.1");
    assert_eq!(record.identity.address, "Lat: 42.4, Lng: -83.1");
    assert_eq!(record.zoning.district, "R1");
}

#[tokio::test]
async fn test_empty_query_rejected() {
    let service = address_book_service();
    let err = service
        .search_site(&SiteQuery::by_address("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::MissingQuery));
}

#[tokio::test]
async fn test_custom_environment_source() {
    let service = address_book_service().with_environment(Arc::new(ConstantEnvironment));
    let record = service
        .search_site(&SiteQuery::by_coordinates(42.40, -83.10))
        .await
        .unwrap();
    assert_eq!(record.environmental.annual_sun_hours, 1234);
    assert_eq!(record.recommendations, vec!["Only one".to_string()]);
}

// ============================================================================
// Site Id Tests
// ============================================================================

#[tokio::test]
async fn test_get_site_matches_search() {
    let service = address_book_service();
    let searched = service
        .search_site(&SiteQuery::by_address(DETROIT_ADDRESS))
        .await
        .unwrap();

    let fetched = service.get_site(searched.id()).await.unwrap();
    assert_eq!(*fetched, *searched);
}

#[tokio::test]
async fn test_get_site_survives_cache_loss() {
    let searching = address_book_service();
    let id = searching
        .search_site(&SiteQuery::by_address(DETROIT_ADDRESS))
        .await
        .unwrap()
        .id()
        .to_string();

    // A different service instance has never seen the id
    let fresh = address_book_service();
    let record = fresh.get_site(&id).await.unwrap();
    assert_eq!(record.identity.address, DETROIT_ADDRESS);
    assert_eq!(record.zoning.district, "B4");
}

#[tokio::test]
async fn test_get_site_unknown_id() {
    let service = address_book_service();
    let err = service.get_site("!!not-an-id!!").await.unwrap_err();
    assert!(matches!(err, SiteError::NotFound(_)));
}

// ============================================================================
// Cache and Reload Tests
// ============================================================================

#[tokio::test]
async fn test_repeat_search_is_cached() {
    let service = address_book_service();
    let query = SiteQuery::by_address(DETROIT_ADDRESS);

    let first = service.search_site(&query).await.unwrap();
    let second = service.search_site(&query).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let stats = service.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_reload_invalidates_cached_records() {
    let file = flat_catalog_file();
    let service = address_book_service().with_catalog_path(file.path());
    let query = SiteQuery::by_address(DETROIT_ADDRESS);

    let before = service.search_site(&query).await.unwrap();
    assert_eq!(before.zoning.district, "B4");

    assert_eq!(service.reload_catalog().unwrap(), 2);

    let after = service.search_site(&query).await.unwrap();
    assert_eq!(after.zoning.district, "FLAT");
    assert_eq!(after.zoning_provenance, Provenance::GlobalGeneric);
    assert_eq!(after.id(), before.id());
}
