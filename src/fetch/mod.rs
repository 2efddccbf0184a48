//! Fetch module for requesting and scraping the resource list
//!
//! This module contains the fetch side of the system, including:
//! - The coordinator that owns server/sort selection and runs one cycle per call
//! - The transport abstraction and its reqwest implementation
//! - The poller that schedules cycles on an interval

mod coordinator;
mod poller;
mod session;
mod transport;

pub use coordinator::{FetchCoordinator, FetchOutcome};
pub use poller::{PollControl, PollSummary, Poller, StopReason, MIN_POLL_INTERVAL};
pub use session::{FetchSession, DEFAULT_SERVER_ID};
pub use transport::{
    build_http_client, listing_endpoint, HttpTransport, ListingRequest, Transport, TransportError,
};

use crate::config::Config;
use crate::resource::SortKey;
use crate::HarvestError;

/// Builds a coordinator with an HTTP transport from configuration
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// * `Ok(FetchCoordinator)` - Coordinator set to the configured server and sort
/// * `Err(HarvestError)` - The HTTP client or the configured selection is invalid
pub fn coordinator_from_config(
    config: &Config,
) -> Result<FetchCoordinator<HttpTransport>, HarvestError> {
    let transport = HttpTransport::new(&config.upstream, &config.user_agent)?;
    let sort_key = config
        .session
        .sort
        .parse::<SortKey>()
        .map_err(crate::ConfigError::Validation)?;
    let session = FetchSession::new(config.session.server_id.clone(), sort_key);
    Ok(FetchCoordinator::with_session(transport, session))
}
