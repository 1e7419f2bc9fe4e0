//! HTTP client for the location-data service.
//!
//! This module provides:
//!
//! - `LocationClient`: reqwest wrapper over the three list endpoints
//! - `LocationError`: typed fetch failures
//!
//! The service exposes plain GET endpoints returning JSON arrays of names:
//!
//! - `/countries`
//! - `/country={country}/states`
//! - `/country={country}/state={state}/cities`
//!
//! Country and state values are inserted as percent-encoded path segments,
//! so names containing spaces or reserved characters produce valid URLs.

use thiserror::Error;
use url::Url;

/// User agent for service requests
const USER_AGENT: &str = concat!("Gazetteer/", env!("CARGO_PKG_VERSION"));

/// A failed fetch against the location service
#[derive(Debug, Error)]
pub enum LocationError {
    /// The server responded with a non-success status
    #[error("location service returned HTTP {0}")]
    Status(reqwest::StatusCode),
    /// Network failure or malformed response body
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// The configured base URL is unusable
    #[error("invalid service URL {url:?}: {reason}")]
    BadBaseUrl { url: String, reason: String },
}

/// Location service client
#[derive(Clone)]
pub struct LocationClient {
    client: reqwest::Client,
    base: Url,
}

impl LocationClient {
    /// Create a client against the given service base URL.
    ///
    /// The URL is validated here so endpoint building never fails later.
    pub fn new(base_url: &str) -> Result<Self, LocationError> {
        let base = Url::parse(base_url).map_err(|e| LocationError::BadBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(LocationError::BadBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, base })
    }

    /// Build an endpoint URL by appending encoded path segments to the base
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Validated in `new`: the base URL accepts path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    pub(crate) fn countries_url(&self) -> Url {
        self.endpoint(&["countries"])
    }

    pub(crate) fn states_url(&self, country: &str) -> Url {
        let scope = format!("country={country}");
        self.endpoint(&[scope.as_str(), "states"])
    }

    pub(crate) fn cities_url(&self, country: &str, state: &str) -> Url {
        let country_scope = format!("country={country}");
        let state_scope = format!("state={state}");
        self.endpoint(&[country_scope.as_str(), state_scope.as_str(), "cities"])
    }

    /// GET a JSON array of names from the given endpoint
    async fn get_names(&self, url: Url) -> Result<Vec<String>, LocationError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(LocationError::Status(response.status()));
        }

        let names: Vec<String> = response.json().await?;
        Ok(names)
    }

    /// Fetch the full country list
    pub async fn countries(&self) -> Result<Vec<String>, LocationError> {
        self.get_names(self.countries_url()).await
    }

    /// Fetch the state list for a country
    pub async fn states(&self, country: &str) -> Result<Vec<String>, LocationError> {
        self.get_names(self.states_url(country)).await
    }

    /// Fetch the city list for a country/state pair
    pub async fn cities(&self, country: &str, state: &str) -> Result<Vec<String>, LocationError> {
        self.get_names(self.cities_url(country, state)).await
    }
}
