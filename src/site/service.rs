//! Site service
//!
//! Ties geocoding, zoning resolution, record assembly and the site cache
//! together. Every request carries its own [`SiteQuery`]; the service keeps
//! no per-request state besides the advisory cache.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::cache::{CacheStatsSnapshot, SiteCache};
use super::id::{coordinate_address, decode_site_id, SiteQuery};
use super::record::{EnvironmentalSource, SiteIdentity, SiteRecord, SiteRecordBuilder};
use crate::config::Config;
use crate::environmental::{self, ClimateData, FloodRiskData, SolarData};
use crate::error::{CatalogError, FeasibilityError, SiteError, SiteScoutError};
use crate::feasibility::{self, CostEstimate, CostIndices, CostInputs};
use crate::geocode::{self, FallbackGeocoder, SeededGeocoder};
use crate::zoning::{Coordinate, RegionCatalog, Resolution, ZoningRegulations, ZoningResolver};

/// Site analysis facade used by the control socket and the binary
#[derive(Debug)]
pub struct SiteService {
    resolver: Arc<ZoningResolver>,
    geocoder: FallbackGeocoder,
    builder: SiteRecordBuilder,
    cache: SiteCache,
    catalog_path: Option<PathBuf>,
}

impl SiteService {
    /// Create a service from its parts
    #[must_use]
    pub fn new(resolver: Arc<ZoningResolver>, geocoder: FallbackGeocoder, cache: SiteCache) -> Self {
        Self {
            resolver,
            geocoder,
            builder: SiteRecordBuilder::default(),
            cache,
            catalog_path: None,
        }
    }

    /// Service over the builtin catalog with the offline geocoder
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(ZoningResolver::builtin()),
            FallbackGeocoder::new(Arc::new(SeededGeocoder::new())),
            SiteCache::new(&crate::config::CacheConfig::default()),
        )
    }

    /// Build the service described by a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded or the
    /// geocoder cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, SiteScoutError> {
        let catalog = match &config.zoning.catalog_path {
            Some(path) => RegionCatalog::load(path)?,
            None => RegionCatalog::builtin(),
        };
        let geocoder = geocode::from_config(&config.geocoder)?;
        info!(
            regions = catalog.regions.len(),
            localities = catalog.locality_count(),
            geocoder = geocoder.provider(),
            "site service ready"
        );

        let mut service = Self::new(
            Arc::new(ZoningResolver::new(catalog)),
            geocoder,
            SiteCache::new(&config.cache),
        );
        service.catalog_path.clone_from(&config.zoning.catalog_path);
        Ok(service)
    }

    /// Replace the environmental source used for new records
    #[must_use]
    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentalSource>) -> Self {
        self.builder = SiteRecordBuilder::new(environment);
        self
    }

    /// Catalog file re-read by [`Self::reload_catalog`]
    #[must_use]
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Shared resolver
    #[must_use]
    pub fn resolver(&self) -> &Arc<ZoningResolver> {
        &self.resolver
    }

    /// Geocoder in use
    #[must_use]
    pub fn geocoder(&self) -> &FallbackGeocoder {
        &self.geocoder
    }

    /// Search for a site by address or coordinate
    ///
    /// Geocoding failures never surface here: the fallback coordinate is used
    /// and flagged on the record.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::MissingQuery` if the query names no site.
    pub async fn search_site(&self, query: &SiteQuery) -> Result<Arc<SiteRecord>, SiteError> {
        query.validate()?;
        let id = query.site_id()?;
        if let Some(record) = self.cache.get(&id) {
            return Ok(record);
        }

        let identity = match (query.address(), query.coordinate()) {
            (Some(address), _) => {
                let outcome = self.geocoder.resolve(address).await;
                SiteIdentity {
                    id,
                    address: address.to_string(),
                    coordinates: outcome.coordinate,
                    geocode_fallback: outcome.fallback_used,
                }
            }
            (None, Some(coord)) => SiteIdentity {
                id,
                address: coordinate_address(coord),
                coordinates: coord,
                geocode_fallback: false,
            },
            (None, None) => return Err(SiteError::MissingQuery),
        };

        let coord = identity.coordinates;
        let catalog_version = self.resolver.version();
        let resolution = self.resolver.resolve_detailed(coord);
        debug!(site_id = %identity.id, %resolution, "built site record");
        let record = Arc::new(self.builder.build(identity, coord, resolution));
        self.cache_record(&record, catalog_version);
        Ok(record)
    }

    /// Cache a freshly built record unless it would outlive its inputs
    ///
    /// Fallback records are skipped so the address is geocoded again on the
    /// next search. Records resolved against a catalog that has since been
    /// replaced are skipped so they cannot survive the reload's cache clear.
    fn cache_record(&self, record: &Arc<SiteRecord>, catalog_version: u64) {
        if record.identity.geocode_fallback {
            debug!(site_id = %record.id(), "not caching record built from fallback coordinate");
            return;
        }
        if self.resolver.version() != catalog_version {
            debug!(site_id = %record.id(), "catalog reloaded during search, not caching");
            return;
        }
        self.cache.insert(Arc::clone(record));
    }

    /// Fetch a site by id
    ///
    /// The id is decoded back into its query, so this works for any id the
    /// service has ever issued whether or not it is still cached.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` for ids that do not decode.
    pub async fn get_site(&self, id: &str) -> Result<Arc<SiteRecord>, SiteError> {
        if let Some(record) = self.cache.get(id) {
            return Ok(record);
        }
        let query = decode_site_id(id)?;
        self.search_site(&query).await
    }

    /// Resolve zoning for a coordinate
    #[must_use]
    pub fn zoning(&self, coord: Coordinate) -> Resolution {
        self.resolver.resolve_detailed(coord)
    }

    /// Regulation summary for a district code
    #[must_use]
    pub fn regulations(&self, zone_id: &str) -> Option<ZoningRegulations> {
        self.resolver.regulations(zone_id)
    }

    #[must_use]
    pub fn climate(&self, coord: Coordinate) -> ClimateData {
        environmental::climate(coord)
    }

    #[must_use]
    pub fn solar(&self, coord: Coordinate) -> SolarData {
        environmental::solar(coord)
    }

    #[must_use]
    pub fn flood_risk(&self, coord: Coordinate) -> FloodRiskData {
        environmental::flood_risk(coord)
    }

    /// Feasibility estimate
    ///
    /// # Errors
    ///
    /// Returns `FeasibilityError` for invalid building size or quality level.
    pub fn calculate_costs(&self, inputs: &CostInputs) -> Result<CostEstimate, FeasibilityError> {
        feasibility::calculate_costs(inputs)
    }

    #[must_use]
    pub fn cost_indices(&self) -> CostIndices {
        feasibility::cost_indices()
    }

    /// Site cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Re-read the catalog file (or restore the builtin catalog) and swap it in
    ///
    /// The site cache is cleared, since cached records may carry districts
    /// from the old catalog. Returns the new catalog version.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be loaded; the current
    /// catalog stays in place.
    pub fn reload_catalog(&self) -> Result<u64, CatalogError> {
        let catalog = match &self.catalog_path {
            Some(path) => RegionCatalog::load(path)?,
            None => RegionCatalog::builtin(),
        };
        Ok(self.install_catalog(catalog))
    }

    /// Swap in an already validated catalog
    pub fn install_catalog(&self, catalog: RegionCatalog) -> u64 {
        let regions = catalog.regions.len();
        let version = self.resolver.reload(catalog);
        self.cache.clear();
        info!(version, regions, "zoning catalog reloaded");
        version
    }
}
