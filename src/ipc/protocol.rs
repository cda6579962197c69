//! IPC Protocol definitions
//!
//! This module defines the command and response types used for
//! inter-process communication via Unix socket.

use serde::{Deserialize, Serialize};

use crate::environmental::{ClimateData, FloodRiskData, SolarData};
use crate::feasibility::{CostEstimate, CostIndices, CostInputs};
use crate::site::{CacheStatsSnapshot, SiteQuery, SiteRecord};
use crate::zoning::{Resolution, ZoningRegulations};

/// IPC command types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcCommand {
    /// Ping to check if the server is alive
    Ping,

    /// Get server status
    Status,

    /// Search for a site by address or coordinates
    SearchSite(SiteQuery),

    /// Fetch a site by id
    GetSite {
        /// Id returned by a previous search
        site_id: String,
    },

    /// Resolve zoning for a coordinate
    ///
    /// Missing components resolve through the global palette.
    GetZoning {
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
    },

    /// Regulations summary for a district code
    GetRegulations {
        /// District code, e.g. "B4"
        zone_id: String,
    },

    /// Climate data for a coordinate
    GetClimate {
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
    },

    /// Solar analysis for a coordinate
    GetSolar {
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
    },

    /// Flood risk for a coordinate
    GetFloodRisk {
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
    },

    /// Feasibility estimate
    CalculateCosts(CostInputs),

    /// Construction cost indices
    GetCostIndices,

    /// Site cache statistics
    GetCacheStats,

    /// Re-read the zoning catalog and swap it in
    ReloadCatalog,

    /// Initiate graceful shutdown
    Shutdown,
}

/// IPC response types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcResponse {
    /// Ping response
    Pong,

    /// Status response
    Status(ServerStatus),

    /// Site record
    Site(SiteRecord),

    /// Zoning resolution with provenance
    Zoning(Resolution),

    /// Regulations summary
    Regulations(ZoningRegulations),

    Climate(ClimateData),

    Solar(SolarData),

    FloodRisk(FloodRiskData),

    CostEstimate(CostEstimate),

    CostIndices(CostIndices),

    CacheStats(CacheStatsSnapshot),

    /// Catalog swapped in
    CatalogReloaded {
        /// New catalog version
        version: u64,
    },

    /// Success response (for commands that don't return data)
    Success {
        /// Optional message
        message: Option<String>,
    },

    /// Error response
    Error(ResponseError),
}

impl IpcResponse {
    /// Create a success response with no message
    pub fn success() -> Self {
        Self::Success { message: None }
    }

    /// Create a success response with a message
    pub fn success_with_message(msg: impl Into<String>) -> Self {
        Self::Success {
            message: Some(msg.into()),
        }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error(ResponseError {
            code,
            message: message.into(),
        })
    }

    /// Check if this is an error response
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Server status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Zoning catalog version (incremented on reload)
    pub catalog_version: u64,
    /// Regions in the active catalog
    pub regions: usize,
    /// Localities across all regions
    pub localities: usize,
    /// Geocoder provider name
    pub geocoder: String,
    /// Cached site records
    pub cached_sites: u64,
    /// Whether shutdown is in progress
    pub shutting_down: bool,
}

/// Error carried in an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Error code
    pub code: ErrorCode,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ResponseError {}

/// Error codes for IPC responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid command
    InvalidCommand,
    /// Invalid parameters
    InvalidParameters,
    /// Resource not found
    NotFound,
    /// Operation failed
    OperationFailed,
    /// Server is shutting down
    ShuttingDown,
    /// Internal error
    InternalError,
}

/// Message framing for IPC
///
/// Messages are length-prefixed:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON message
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024; // 1 MB
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Encode a message with length prefix
///
/// # Errors
///
/// Returns an error if serialization fails or the JSON body does not fit
/// in the u32 length prefix.
pub fn encode_message<T: Serialize>(msg: &T) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_vec(msg)?;
    let len = u32::try_from(json.len())
        .map_err(<serde_json::Error as serde::ser::Error>::custom)?;

    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + json.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&json);

    Ok(buf)
}

/// Decode a message body (without the length prefix)
///
/// # Errors
///
/// Returns an error if the body is not valid JSON for `T`.
pub fn decode_message<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(data)
}
