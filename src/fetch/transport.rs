//! HTTP transport for the resource-list endpoint
//!
//! This module handles the one request a fetch cycle makes, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Encoding the listing form and session cookie
//! - Classifying failures into [`TransportError`]
//!
//! The coordinator only depends on the [`Transport`] trait, so tests can swap
//! in an in-memory implementation.

use crate::config::{UpstreamConfig, UserAgentConfig};
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failures a transport can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The site rejected the session (HTTP 401/403)
    #[error("session rejected with HTTP {status}")]
    Unauthorized { status: u16 },

    /// Any other non-success HTTP status
    #[error("HTTP error {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("request cancelled")]
    Cancelled,
}

/// Parameters of one resource-list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// Upstream server (galaxy) identifier
    pub server_id: String,

    /// Upstream name of the sort order
    pub sort_param: &'static str,
}

impl ListingRequest {
    /// Form fields posted to the listing endpoint
    ///
    /// Everything except galaxy and sort is pinned to "show all": any planet,
    /// any group, any type, no favorites filter, no unavailable resources.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("galaxy", self.server_id.clone()),
            ("unavailableDays", "0".to_string()),
            ("planetSel", "any".to_string()),
            ("resGroup", "any".to_string()),
            ("resType", "any".to_string()),
            ("favorite", String::new()),
            ("sort", self.sort_param.to_string()),
        ]
    }
}

/// Something that can turn a listing request and a session token into HTML
///
/// Implementations own timeout and cancellation policy and must report both
/// as errors rather than hanging or panicking.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_listing(
        &self,
        request: &ListingRequest,
        session_token: &str,
    ) -> Result<String, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `upstream` - Upstream settings (for the request timeout)
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    upstream: &UpstreamConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version
    let user_agent = format!("{}/{}", user_agent.name, user_agent.version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(upstream.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    cookie_name: String,
}

impl HttpTransport {
    /// Creates a transport from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpTransport)` - Ready to send requests
    /// * `Err(HarvestError)` - The endpoint URL or the HTTP client is invalid
    pub fn new(upstream: &UpstreamConfig, user_agent: &UserAgentConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(upstream, user_agent)?;
        let endpoint = listing_endpoint(&upstream.base_url, &upstream.listing_path)?;
        Ok(Self::with_client(client, endpoint, &upstream.session_cookie))
    }

    /// Creates a transport around an existing client
    pub fn with_client(client: Client, endpoint: Url, cookie_name: &str) -> Self {
        Self {
            client,
            endpoint,
            cookie_name: cookie_name.to_string(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Joins the listing path onto the base URL
///
/// The base is treated as a directory, so `https://host/gh` and
/// `https://host/gh/` both resolve `getResourceList.py` under `/gh/`.
pub fn listing_endpoint(base_url: &str, listing_path: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(listing_path.trim_start_matches('/'))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_listing(
        &self,
        request: &ListingRequest,
        session_token: &str,
    ) -> Result<String, TransportError> {
        tracing::debug!(
            "POST {} (galaxy={}, sort={})",
            self.endpoint,
            request.server_id,
            request.sort_param
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(COOKIE, format!("{}={}", self.cookie_name, session_token))
            .form(&request.form_fields())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify_error)?;
        tracing::debug!("Received {} bytes from {}", body.len(), self.endpoint);
        Ok(body)
    }
}

/// Maps a reqwest failure to the transport taxonomy
fn classify_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Network(format!("connection failed: {}", e))
    } else {
        TransportError::Network(e.to_string())
    }
}
