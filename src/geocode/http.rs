//! HTTP geocoder for Nominatim-compatible search endpoints
//!
//! Sends `GET <endpoint>?q=<address>&format=json&limit=1` and reads the
//! `lat`/`lon` strings of the first result. HTTPS uses rustls with the
//! webpki root store; plain HTTP is accepted for local test endpoints.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use site_scout::geocode::{Geocoder, HttpGeocoder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let geocoder = HttpGeocoder::new(
//!     "https://nominatim.openstreetmap.org/search",
//!     "site-scout/0.1",
//!     Duration::from_secs(5),
//! )?;
//! let coord = geocoder.geocode("1 Woodward Ave, Detroit, MI").await?;
//! println!("{coord}");
//! # Ok(())
//! # }
//! ```

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::debug;

use super::traits::Geocoder;
use crate::error::GeocodeError;
use crate::zoning::Coordinate;

/// Largest response body accepted from the provider
const MAX_RESPONSE_SIZE: usize = 256 * 1024;

const PROVIDER: &str = "http";

/// One search result; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim-compatible HTTP API
pub struct HttpGeocoder {
    endpoint: Uri,
    user_agent: String,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    request_timeout: Duration,
}

impl std::fmt::Debug for HttpGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeocoder")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl HttpGeocoder {
    /// Create a geocoder for a search endpoint
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::Config` if the endpoint is not an http(s) URL
    /// or TLS cannot be configured.
    pub fn new(
        endpoint: &str,
        user_agent: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| GeocodeError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
        match uri.scheme_str() {
            Some("https" | "http") => {}
            other => {
                return Err(GeocodeError::Config(format!(
                    "endpoint must use http or https, got: {}",
                    other.unwrap_or("none")
                )))
            }
        }
        if uri.query().is_some() {
            return Err(GeocodeError::Config(
                "endpoint must not carry a query string".into(),
            ));
        }

        let root_store =
            rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| GeocodeError::Config(format!("TLS setup failed: {e}")))?
        .with_root_certificates(root_store)
        .with_no_client_auth();

        let https = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            endpoint: uri,
            user_agent: user_agent.into(),
            client,
            request_timeout: request_timeout.max(Duration::from_millis(1)),
        })
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    fn search_uri(&self, address: &str) -> Result<Uri, GeocodeError> {
        let query = format!(
            "{}?q={}&format=json&limit=1",
            self.endpoint,
            encode_query_component(address)
        );
        query
            .parse()
            .map_err(|e| GeocodeError::request(PROVIDER, format!("invalid search URL: {e}")))
    }

    async fn collect_body(&self, body: Incoming) -> Result<Bytes, GeocodeError> {
        let collected = timeout(self.request_timeout, body.collect())
            .await
            .map_err(|_| GeocodeError::timeout(PROVIDER, self.request_timeout))?
            .map_err(|e| GeocodeError::request(PROVIDER, format!("failed to read body: {e}")))?;
        Ok(collected.to_bytes())
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::MalformedAddress(address.to_string()));
        }

        let request = Request::builder()
            .method(Method::GET)
            .uri(self.search_uri(address)?)
            .header(header::USER_AGENT, self.user_agent.as_str())
            .header(header::ACCEPT, "application/json")
            .body(Empty::new())
            .map_err(|e| GeocodeError::request(PROVIDER, format!("failed to build request: {e}")))?;

        let response = timeout(self.request_timeout, self.client.request(request))
            .await
            .map_err(|_| GeocodeError::timeout(PROVIDER, self.request_timeout))?
            .map_err(|e| GeocodeError::request(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::request(PROVIDER, format!("HTTP {status}")));
        }

        let body = self.collect_body(response.into_body()).await?;
        if body.len() > MAX_RESPONSE_SIZE {
            return Err(GeocodeError::InvalidResponse(format!(
                "response too large: {} bytes",
                body.len()
            )));
        }

        let coord = parse_search_response(&body, address)?;
        debug!(address, %coord, "geocoded address");
        Ok(coord)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Parse a Nominatim JSON search response into the first coordinate
fn parse_search_response(body: &[u8], address: &str) -> Result<Coordinate, GeocodeError> {
    let places: Vec<Place> = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
    let place = places
        .first()
        .ok_or_else(|| GeocodeError::NoResults(address.to_string()))?;

    let parse = |field: &str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GeocodeError::InvalidResponse(format!("bad {field}: {value:?}")))
    };
    Ok(Coordinate::new(
        parse("lat", &place.lat)?,
        parse("lon", &place.lon)?,
    ))
}

/// Percent-encode a query component (RFC 3986 unreserved characters kept)
fn encode_query_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
