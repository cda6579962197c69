//! Geo-zoning resolution
//!
//! This module provides:
//! - Core types (coordinates, bounding boxes, area tests, district records)
//! - Region and locality matching
//! - Per-locality district rules
//! - Deterministic archetype palettes
//! - The builtin Michigan catalog and JSON catalog loading
//! - The three-tier resolver and regulation summaries
//!
//! # Architecture
//!
//! Rules are declarative data. A catalog holds regions in registration
//! order; each region holds locality boundaries and rule sets in declaration
//! order. At every level the first match wins, and every level has a default,
//! so any coordinate resolves to exactly one district.
//!
//! # Example
//!
//! ```
//! use site_scout::zoning::{Coordinate, RegionCatalog, ZoningResolver};
//!
//! let catalog = RegionCatalog::builtin();
//! catalog.validate().unwrap();
//!
//! let resolver = ZoningResolver::new(catalog);
//! let district = resolver.resolve(Coordinate::new(42.40, -83.10));
//! assert_eq!(district.district, "R1");
//! assert_eq!(district.source, "Detroit Zoning Ordinance (Mock)");
//! ```

pub mod catalog;
pub mod district;
pub mod engine;
pub mod michigan;
pub mod palette;
pub mod region;
pub mod regulations;
pub mod types;

// Re-exports
pub use catalog::RegionCatalog;
pub use district::{LocalityRule, LocalityRules, RuleMatch};
pub use engine::{Resolution, ZoningResolver};
pub use michigan::{michigan, MICHIGAN};
pub use palette::{coordinate_key, global_palette, DistrictPalette, GLOBAL_PALETTE_SOURCE};
pub use region::{LocalityBoundary, Region, RegionMatcher};
pub use regulations::{HeightAndBulk, ZoningRegulations};
pub use types::*;
