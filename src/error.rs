//! Error types for site-scout
//!
//! This module defines the error hierarchy for the site analysis service.
//! Errors are grouped by subsystem and classified as recoverable or not.
//!
//! Zoning resolution itself has no error type: every tier of the resolver
//! has a total-coverage default, so resolution cannot fail once a catalog
//! has been validated.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for site-scout
#[derive(Debug, Error)]
pub enum SiteScoutError {
    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Region catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Geocoding errors
    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Site lookup errors
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    /// Feasibility input errors
    #[error("Feasibility error: {0}")]
    Feasibility(#[from] FeasibilityError),

    /// IPC communication errors
    #[error("IPC error: {0}")]
    Ipc(#[from] IpcError),

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SiteScoutError {
    /// Check if this error is recoverable (can retry operation)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Catalog(_) => false,
            Self::Geocode(e) => e.is_recoverable(),
            Self::Site(e) => e.is_recoverable(),
            Self::Feasibility(_) => false,
            Self::Ipc(e) => e.is_recoverable(),
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut
                    | io::ErrorKind::Interrupted
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::ConnectionReset
            ),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, missing required fields)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {name}: {reason}")]
    EnvError { name: String, reason: String },

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

impl ConfigError {
    /// Config errors are generally not recoverable without user intervention
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Region catalog loading and validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to load zoning catalog {path}: {reason}")]
    LoadError { path: String, reason: String },

    /// Catalog file is not valid JSON for the catalog schema
    #[error("Failed to parse zoning catalog: {0}")]
    ParseError(String),

    /// A bounding box has inverted or non-finite edges
    #[error("Invalid bounding box in {context}: {reason}")]
    InvalidBoundingBox { context: String, reason: String },

    /// Two regions share a name
    #[error("Duplicate region: {0}")]
    DuplicateRegion(String),

    /// Two localities in one region share a name
    #[error("Duplicate locality '{locality}' in region '{region}'")]
    DuplicateLocality { region: String, locality: String },

    /// A locality boundary names a locality with no rule set
    #[error("Locality '{locality}' in region '{region}' has no rules")]
    UnknownLocality { region: String, locality: String },

    /// A palette has no entries, which would break resolution totality
    #[error("Empty palette: {0}")]
    EmptyPalette(String),

    /// A district record is missing a required field
    #[error("Incomplete district record in {context}: {reason}")]
    IncompleteDistrict { context: String, reason: String },

    /// A name is empty
    #[error("Empty name in {0}")]
    EmptyName(String),

    /// A rule or locality boundary has no area tests and would match everything
    #[error("Empty predicate in {0}")]
    EmptyPredicate(String),
}

impl CatalogError {
    /// Create a bounding box error
    pub fn bounding_box(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBoundingBox {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an incomplete district error
    pub fn incomplete(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IncompleteDistrict {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Geocoding errors
///
/// These never reach the zoning pipeline: the fallback geocoder converts
/// every one of them into the fallback coordinate.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Address text is empty or unusable
    #[error("Malformed address: {0:?}")]
    MalformedAddress(String),

    /// Provider returned no candidates
    #[error("No results for address: {0:?}")]
    NoResults(String),

    /// Request exceeded its deadline
    #[error("Geocoder {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    /// Transport-level failure talking to the provider
    #[error("Geocoder {provider} request failed: {reason}")]
    Request { provider: String, reason: String },

    /// Provider answered with something we could not interpret
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),

    /// Provider could not be constructed from configuration
    #[error("Invalid geocoder configuration: {0}")]
    Config(String),
}

impl GeocodeError {
    /// Check if this error is recoverable
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedAddress(_) | Self::NoResults(_) => false,
            Self::Timeout { .. } | Self::Request { .. } => true,
            Self::InvalidResponse(_) => true,
            Self::Config(_) => false,
        }
    }

    /// Create a request error
    pub fn request(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Request {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(provider: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            timeout,
        }
    }
}

/// Site lookup errors
#[derive(Debug, Error)]
pub enum SiteError {
    /// Neither an address nor coordinates were supplied
    #[error("Please provide either an address or coordinates (lat & lng)")]
    MissingQuery,

    /// Site id cannot be decoded into an address or coordinate pair
    #[error("Site not found: {0}")]
    NotFound(String),
}

impl SiteError {
    /// Site errors reflect bad input and are not recoverable by retrying
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Feasibility calculation input errors
#[derive(Debug, Error)]
pub enum FeasibilityError {
    /// Building size is zero, negative, or not finite
    #[error("Invalid building size: {0}")]
    InvalidBuildingSize(f64),

    /// Quality level outside 0..=3
    #[error("Invalid quality level: {0} (expected 0-3)")]
    InvalidQualityLevel(u8),
}

/// IPC communication errors
#[derive(Debug, Error)]
pub enum IpcError {
    /// Failed to create Unix socket
    #[error("Failed to create IPC socket at {path}: {reason}")]
    SocketCreation { path: String, reason: String },

    /// Failed to bind Unix socket
    #[error("Failed to bind IPC socket to {path}: {reason}")]
    BindError { path: String, reason: String },

    /// Connection error
    #[error("IPC connection error: {0}")]
    ConnectionError(String),

    /// Protocol error (invalid message format)
    #[error("IPC protocol error: {0}")]
    ProtocolError(String),

    /// Serialization error
    #[error("IPC serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("IPC I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl IpcError {
    /// Check if this error is recoverable
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SocketCreation { .. } => false,
            Self::BindError { .. } => false,
            Self::ConnectionError(_) => true,
            Self::ProtocolError(_) => true,
            Self::SerializationError(_) => false,
            Self::IoError(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            ),
        }
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

/// Type alias for Result with `SiteScoutError`
pub type Result<T> = std::result::Result<T, SiteScoutError>;
