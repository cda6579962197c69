//! site-scout: Site analysis service with deterministic geo-zoning
//!
//! This crate answers "what can be built here?" for a postal address or a
//! coordinate: it geocodes the address, resolves a zoning district through a
//! three-tier rule hierarchy, and attaches environmental and feasibility
//! summaries.
//!
//! # Features
//!
//! - **Zoning Resolution**: Region, locality and per-locality rules with
//!   deterministic archetype palettes behind them, so every coordinate
//!   resolves to exactly one district
//! - **Hot Reload**: The region catalog is swapped atomically at runtime
//! - **Geocoding**: Seeded offline geocoder or an HTTP provider, with a
//!   fixed fallback coordinate when lookup fails
//! - **Site Records**: Stable site ids and a bounded TTL cache
//! - **IPC Control**: Unix socket-based queries and runtime control
//!
//! # Architecture
//!
//! ```text
//! address ──► Geocoder ──► Coordinate ──► ZoningResolver ──► SiteRecord
//!                                             │
//!                       region ─► locality ─► rule
//!                          └────────┴──► archetype palette
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use site_scout::config::load_config;
//! use site_scout::site::{SiteQuery, SiteService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("/etc/site-scout/config.json")?;
//! let service = SiteService::from_config(&config)?;
//!
//! let record = service
//!     .search_site(&SiteQuery::by_address("2 Woodward Ave, Detroit"))
//!     .await?;
//! println!("{} is zoned {}", record.identity.address, record.zoning.district);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types and loading
//! - [`environmental`]: Climate, solar and flood summaries
//! - [`error`]: Error types
//! - [`feasibility`]: Construction cost estimates
//! - [`geocode`]: Address to coordinate lookup
//! - [`ipc`]: IPC server and protocol
//! - [`site`]: Site ids, records, cache and the service facade
//! - [`zoning`]: Catalog, rules and the resolver

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod environmental;
pub mod error;
pub mod feasibility;
pub mod geocode;
pub mod ipc;
pub mod site;
pub mod zoning;

// Re-export commonly used types at the crate root
pub use config::{Config, GeocoderConfig, IpcConfig};
pub use error::{
    CatalogError, ConfigError, FeasibilityError, GeocodeError, IpcError, SiteError, SiteScoutError,
};
pub use geocode::{FallbackGeocoder, Geocoder};
pub use ipc::{IpcClient, IpcCommand, IpcResponse, IpcServer};
pub use site::{SiteQuery, SiteRecord, SiteService};
pub use zoning::{Coordinate, Provenance, RegionCatalog, Resolution, ZoningDistrict, ZoningResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_builtin_resolver_covers_any_coordinate() {
        let resolver = ZoningResolver::builtin();
        for coord in [
            Coordinate::new(42.40, -83.10),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-33.87, 151.21),
            Coordinate::unknown(),
        ] {
            assert!(!resolver.resolve(coord).district.is_empty());
        }
    }
}
