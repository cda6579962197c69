//! Site analysis
//!
//! This module provides:
//! - Request-scoped site queries and reversible site ids
//! - Site record assembly from a zoning resolution and environmental data
//! - An advisory moka-backed record cache
//! - [`SiteService`], the facade used by the control socket and the binary

pub mod cache;
pub mod id;
pub mod record;
pub mod service;

pub use cache::{CacheStats, CacheStatsSnapshot, SiteCache};
pub use id::{coordinate_address, decode_site_id, SiteQuery};
pub use record::{
    EnvironmentalSource, EnvironmentalSummary, SeededEnvironment, SiteIdentity, SiteRecord,
    SiteRecordBuilder,
};
pub use service::SiteService;
