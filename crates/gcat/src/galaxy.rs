//! Blocking HTTP client for the Galaxy API.

use std::time::Duration;

use gcat_catalog::{InstanceConfig, ToolElement};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors talking to a Galaxy server.
#[derive(Debug, Error)]
pub enum GalaxyError {
    /// The URL is not an absolute http(s) URL.
    #[error("invalid server URL {0:?}: expected http:// or https://")]
    InvalidUrl(String),
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// A request failed or returned an unusable response.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Endpoint requested.
        url: String,
        /// Underlying transport or decoding error.
        source: reqwest::Error,
    },
}

/// Normalizes a server URL: trims whitespace and trailing slashes, requires a scheme.
pub fn normalize_url(url: &str) -> Result<String, GalaxyError> {
    let trimmed = url.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|host| !host.is_empty()));
    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(GalaxyError::InvalidUrl(url.to_string()))
    }
}

/// Client for the read-only Galaxy endpoints the catalog needs.
pub struct GalaxyClient {
    /// Shared HTTP client.
    client: Client,
}

impl GalaxyClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, GalaxyError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gcat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GalaxyError::Client)?;
        Ok(Self { client })
    }

    /// Fetches `/api/configuration` from the server at `base`.
    pub fn fetch_config(&self, base: &str) -> Result<InstanceConfig, GalaxyError> {
        self.get_json(&endpoint(base, "api/configuration"))
    }

    /// Fetches the flat tool list from the server at `base`.
    pub fn fetch_tools(&self, base: &str) -> Result<Vec<ToolElement>, GalaxyError> {
        self.get_json(&endpoint(base, "api/tools?in_panel=false"))
    }

    /// Issues a GET and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GalaxyError> {
        debug!(url, "GET");
        let request_err = |source: reqwest::Error| GalaxyError::Request {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(request_err)
    }
}

/// Joins an API path onto a normalized base URL.
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
