//! Harvest-Watch: a resource listing monitor for Galaxy Harvester
//!
//! This crate fetches the resource list of a chosen game server on behalf of an
//! authenticated user and recovers structured resource records from the
//! irregular HTML the site returns.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod resource;
pub mod storage;

use thiserror::Error;

/// Main error type for Harvest-Watch operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by a single fetch cycle
///
/// The four variants are the only failures a caller has to handle; per-entry
/// extraction anomalies never surface here, they travel as
/// [`extract::Diagnostic`] values next to the records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A configuration call was rejected; the previous configuration is kept
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No session token, a malformed one, or one the site refused
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Network or HTTP layer failure, including timeouts and cancellation
    #[error("Transport error: {0}")]
    Transport(fetch::TransportError),

    /// The site answered but the body is not a recognizable resource list
    #[error("Upstream error: {0}")]
    Upstream(#[from] extract::ParseFailure),
}

impl FetchError {
    /// Returns a short, actionable message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "Invalid settings, check the server and sort order",
            Self::Unauthenticated(_) => "Please log in to Galaxy Harvester again",
            Self::Transport(_) => "Network error, will retry",
            Self::Upstream(_) => "The site may have changed, resource list could not be read",
        }
    }

    /// Returns true if retrying on the next cycle can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Upstream(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Harvest-Watch operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract, Diagnostic, DiagnosticField, Extraction, ParseFailure};
pub use fetch::{FetchCoordinator, FetchOutcome, FetchSession, HttpTransport, Transport};
pub use resource::{ResourceRecord, SortKey, StatValue, Upload};
