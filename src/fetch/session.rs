//! Coordinator state: current server, sort order and last successful fetch

use crate::resource::SortKey;
use chrono::{DateTime, Utc};

/// Default upstream server (Finalizer)
pub const DEFAULT_SERVER_ID: &str = "118";

/// Server and sort selection owned by a [`FetchCoordinator`]
///
/// Lives as long as the coordinator; persisting it is the caller's job.
///
/// [`FetchCoordinator`]: crate::fetch::FetchCoordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSession {
    server_id: String,
    sort_key: SortKey,
    last_fetched_at: Option<DateTime<Utc>>,
}

impl FetchSession {
    /// Creates a session that has never fetched
    pub fn new(server_id: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            server_id: server_id.into(),
            sort_key,
            last_fetched_at: None,
        }
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Time of the last successful fetch, if any
    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetched_at
    }

    /// Replaces server and sort together
    pub(crate) fn reconfigure(&mut self, server_id: String, sort_key: SortKey) {
        self.server_id = server_id;
        self.sort_key = sort_key;
    }

    pub(crate) fn mark_fetched(&mut self, at: DateTime<Utc>) {
        self.last_fetched_at = Some(at);
    }
}

impl Default for FetchSession {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_ID, SortKey::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = FetchSession::default();
        assert_eq!(session.server_id(), "118");
        assert_eq!(session.sort_key(), SortKey::ByUploadTime);
        assert_eq!(session.last_fetched_at(), None);
    }

    #[test]
    fn test_reconfigure_keeps_last_fetch() {
        let mut session = FetchSession::default();
        let now = Utc::now();
        session.mark_fetched(now);
        session.reconfigure("42".to_string(), SortKey::ByName);

        assert_eq!(session.server_id(), "42");
        assert_eq!(session.sort_key(), SortKey::ByName);
        assert_eq!(session.last_fetched_at(), Some(now));
    }
}
