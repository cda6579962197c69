//! IPC command handler
//!
//! This module processes IPC commands and generates responses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::protocol::{ErrorCode, IpcCommand, IpcResponse, ServerStatus};
use crate::error::{FeasibilityError, SiteError};
use crate::site::SiteService;
use crate::zoning::Coordinate;

/// IPC command handler
pub struct IpcHandler {
    /// Site analysis service
    service: Arc<SiteService>,

    /// Server start time
    start_time: Instant,

    /// Server version
    version: String,

    /// Set once a shutdown command has been accepted
    shutting_down: AtomicBool,
}

impl IpcHandler {
    /// Create a new IPC handler
    pub fn new(service: Arc<SiteService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Check whether shutdown has been requested
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Handle an IPC command and return a response
    pub async fn handle(&self, command: IpcCommand) -> IpcResponse {
        debug!("Handling IPC command: {:?}", command);

        if self.is_shutting_down() && !matches!(command, IpcCommand::Ping | IpcCommand::Status) {
            return IpcResponse::error(ErrorCode::ShuttingDown, "Server is shutting down");
        }

        match command {
            IpcCommand::Ping => IpcResponse::Pong,

            IpcCommand::Status => self.handle_status(),

            IpcCommand::SearchSite(query) => match self.service.search_site(&query).await {
                Ok(record) => IpcResponse::Site((*record).clone()),
                Err(e) => site_error_response(&e),
            },

            IpcCommand::GetSite { site_id } => match self.service.get_site(&site_id).await {
                Ok(record) => IpcResponse::Site((*record).clone()),
                Err(e) => site_error_response(&e),
            },

            IpcCommand::GetZoning { lat, lng } => {
                // Missing coordinates fall through to the global tier
                let coord = match (lat, lng) {
                    (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
                    _ => Coordinate::unknown(),
                };
                IpcResponse::Zoning(self.service.zoning(coord))
            }

            IpcCommand::GetRegulations { zone_id } => match self.service.regulations(&zone_id) {
                Some(regulations) => IpcResponse::Regulations(regulations),
                None => IpcResponse::error(
                    ErrorCode::NotFound,
                    format!("Zoning regulations not found for zone {zone_id}"),
                ),
            },

            IpcCommand::GetClimate { lat, lng } => match require_coordinate(lat, lng) {
                Ok(coord) => IpcResponse::Climate(self.service.climate(coord)),
                Err(response) => response,
            },

            IpcCommand::GetSolar { lat, lng } => match require_coordinate(lat, lng) {
                Ok(coord) => IpcResponse::Solar(self.service.solar(coord)),
                Err(response) => response,
            },

            IpcCommand::GetFloodRisk { lat, lng } => match require_coordinate(lat, lng) {
                Ok(coord) => IpcResponse::FloodRisk(self.service.flood_risk(coord)),
                Err(response) => response,
            },

            IpcCommand::CalculateCosts(inputs) => match self.service.calculate_costs(&inputs) {
                Ok(estimate) => IpcResponse::CostEstimate(estimate),
                Err(e) => feasibility_error_response(&e),
            },

            IpcCommand::GetCostIndices => IpcResponse::CostIndices(self.service.cost_indices()),

            IpcCommand::GetCacheStats => IpcResponse::CacheStats(self.service.cache_stats()),

            IpcCommand::ReloadCatalog => self.handle_reload_catalog(),

            IpcCommand::Shutdown => self.handle_shutdown(),
        }
    }

    /// Handle status command
    fn handle_status(&self) -> IpcResponse {
        let resolver = self.service.resolver();
        let catalog = resolver.catalog();

        IpcResponse::Status(ServerStatus {
            version: self.version.clone(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            catalog_version: resolver.version(),
            regions: catalog.regions.len(),
            localities: catalog.locality_count(),
            geocoder: self.service.geocoder().provider().to_string(),
            cached_sites: self.service.cache_stats().entries,
            shutting_down: self.is_shutting_down(),
        })
    }

    /// Handle reload catalog command
    fn handle_reload_catalog(&self) -> IpcResponse {
        info!("Reloading zoning catalog");
        match self.service.reload_catalog() {
            Ok(version) => IpcResponse::CatalogReloaded { version },
            Err(e) => {
                warn!("Catalog reload failed, keeping current catalog: {}", e);
                IpcResponse::error(ErrorCode::OperationFailed, e.to_string())
            }
        }
    }

    /// Handle shutdown command
    ///
    /// The server loop stops after this response has been written.
    fn handle_shutdown(&self) -> IpcResponse {
        info!("Shutdown requested over IPC");
        self.shutting_down.store(true, Ordering::Release);
        IpcResponse::success_with_message("Shutdown initiated")
    }
}

fn require_coordinate(lat: Option<f64>, lng: Option<f64>) -> Result<Coordinate, IpcResponse> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)),
        _ => Err(IpcResponse::error(
            ErrorCode::InvalidParameters,
            "Please provide coordinates (lat & lng)",
        )),
    }
}

fn site_error_response(error: &SiteError) -> IpcResponse {
    let code = match error {
        SiteError::MissingQuery => ErrorCode::InvalidParameters,
        SiteError::NotFound(_) => ErrorCode::NotFound,
    };
    IpcResponse::error(code, error.to_string())
}

fn feasibility_error_response(error: &FeasibilityError) -> IpcResponse {
    IpcResponse::error(ErrorCode::InvalidParameters, error.to_string())
}
