//! Integration tests for site-scout
//!
//! This module contains integration tests for verifying the behavior of the
//! site analysis components working together.
//!
//! # Test Organization
//!
//! - `zoning_resolution`: Resolver tiers, catalog files and hot reload
//! - `site_pipeline`: Geocoding, site ids, records and the cache
//! - `ipc_control`: End-to-end control socket sessions
//!
//! # Test Requirements
//!
//! - No test needs network access; geocoders are local stubs
//! - IPC tests bind Unix sockets in temporary directories

pub mod ipc_control;
pub mod site_pipeline;
pub mod zoning_resolution;
