//! Fetch coordinator
//!
//! Owns the current server/sort selection and runs one fetch cycle per call:
//! build the request, hand it to the transport, pass the body to the
//! extractor, and classify whatever goes wrong.
//!
//! # Concurrency
//!
//! Both [`FetchCoordinator::configure`] and [`FetchCoordinator::fetch`] take
//! `&mut self`, so at most one fetch can be in flight per coordinator and a
//! configuration change can never race a fetch using the old selection. A
//! caller that wants overlapping cycles needs one coordinator per cycle.
//! No retries and no timeouts live here; those belong to the caller and the
//! transport respectively.

use crate::extract::{extract, Diagnostic};
use crate::fetch::session::FetchSession;
use crate::fetch::transport::{ListingRequest, Transport, TransportError};
use crate::resource::{ResourceRecord, SortKey};
use crate::FetchError;
use chrono::{DateTime, Utc};

/// Result of a successful fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Records in the order the site returned them
    pub records: Vec<ResourceRecord>,

    /// Extraction diagnostics, advisory only
    pub warnings: Vec<Diagnostic>,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Runs authenticated fetch cycles against one transport
pub struct FetchCoordinator<T: Transport> {
    transport: T,
    session: FetchSession,
}

impl<T: Transport> FetchCoordinator<T> {
    /// Creates a coordinator with the default server and sort order
    pub fn new(transport: T) -> Self {
        Self::with_session(transport, FetchSession::default())
    }

    /// Creates a coordinator starting from an existing selection
    pub fn with_session(transport: T, session: FetchSession) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &FetchSession {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Changes server and sort order
    ///
    /// The server id is passed through as-is; whether it exists is for the
    /// site to decide. The sort key may be a client name (`by-name`) or the
    /// site's own parameter name (`resName`).
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Both values were applied
    /// * `Err(FetchError::InvalidConfig)` - Unknown sort key; nothing changed
    pub fn configure(&mut self, server_id: &str, sort_key: &str) -> Result<(), FetchError> {
        let sort_key = sort_key.parse::<SortKey>().map_err(|e| {
            tracing::warn!("Rejected configuration: {}", e);
            FetchError::InvalidConfig(e)
        })?;

        self.session.reconfigure(server_id.to_string(), sort_key);
        tracing::info!("Server set to {}, sort set to {}", server_id, sort_key);
        Ok(())
    }

    /// Request the next fetch will send
    pub fn request(&self) -> ListingRequest {
        ListingRequest {
            server_id: self.session.server_id().to_string(),
            sort_param: self.session.sort_key().upstream_param(),
        }
    }

    /// Performs exactly one fetch cycle
    ///
    /// # Flow
    ///
    /// 1. Reject a blank or malformed token without touching the network
    /// 2. Send one request through the transport
    /// 3. Extract records from the body
    /// 4. On success, record the fetch time
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Blank or malformed token | `Unauthenticated` |
    /// | HTTP 401 / 403 | `Unauthenticated` |
    /// | Other HTTP status, network, timeout, cancel | `Transport` |
    /// | Body is not a recognizable resource list | `Upstream` |
    ///
    /// On error the session is left exactly as it was.
    pub async fn fetch(&mut self, session_token: &str) -> Result<FetchOutcome, FetchError> {
        check_token(session_token)?;

        let request = self.request();
        tracing::debug!(
            "Fetching resources for server {} sorted {}",
            request.server_id,
            self.session.sort_key()
        );

        let body = self
            .transport
            .fetch_listing(&request, session_token.trim())
            .await
            .map_err(|e| match e {
                TransportError::Unauthorized { status } => {
                    FetchError::Unauthenticated(format!("session rejected with HTTP {}", status))
                }
                other => FetchError::Transport(other),
            })?;

        let extraction = extract(&body)?;
        let fetched_at = Utc::now();
        self.session.mark_fetched(fetched_at);

        tracing::info!(
            "Fetched {} resources for server {} ({} diagnostics)",
            extraction.records.len(),
            request.server_id,
            extraction.warnings.len()
        );

        Ok(FetchOutcome {
            records: extraction.records,
            warnings: extraction.warnings,
            fetched_at,
        })
    }
}

/// Rejects tokens that cannot possibly authenticate
fn check_token(token: &str) -> Result<(), FetchError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(FetchError::Unauthenticated(
            "no session token".to_string(),
        ));
    }

    if token
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == ';' || c == ',')
    {
        return Err(FetchError::Unauthenticated(
            "malformed session token".to_string(),
        ));
    }

    Ok(())
}
