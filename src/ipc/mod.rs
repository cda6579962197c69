//! IPC (Inter-Process Communication) module
//!
//! This module provides a Unix socket-based IPC server for querying the
//! site-analysis service and controlling it at runtime.
//!
//! # Protocol
//!
//! Messages are length-prefixed JSON:
//! - 4 bytes: message length (big-endian u32)
//! - N bytes: JSON-encoded command or response
//!
//! # Example
//!
//! ```no_run
//! use site_scout::ipc::{IpcClient, IpcCommand, IpcResponse};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = IpcClient::new("/var/run/site-scout.sock");
//!
//! if client.ping().await? {
//!     println!("Server is alive!");
//! }
//!
//! let response = client
//!     .send(IpcCommand::GetZoning { lat: Some(42.33), lng: Some(-83.045) })
//!     .await?;
//! if let IpcResponse::Zoning(resolution) = response {
//!     println!("District: {}", resolution.district.district);
//! }
//! # Ok(())
//! # }
//! ```

mod handler;
mod protocol;
mod server;

pub use handler::IpcHandler;
pub use protocol::{
    decode_message, encode_message, ErrorCode, IpcCommand, IpcResponse, ResponseError,
    ServerStatus, LENGTH_PREFIX_SIZE, MAX_MESSAGE_SIZE,
};
pub use server::{IpcClient, IpcServer};
