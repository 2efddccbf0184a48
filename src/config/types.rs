use serde::Deserialize;

/// Main configuration structure for Harvest-Watch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// Where and how the resource list is requested
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Site root, e.g. `https://galaxyharvester.net`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Path of the resource-list endpoint relative to the base URL
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,

    /// Name of the session cookie carrying the token
    #[serde(rename = "session-cookie", default = "default_session_cookie")]
    pub session_cookie: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Initial server and sort selection
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Upstream server (galaxy) identifier
    #[serde(rename = "server-id", default = "default_server_id")]
    pub server_id: String,

    /// Sort key name, e.g. `by-upload-time`
    #[serde(default = "default_sort")]
    pub sort: String,
}

/// Polling behavior
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between fetches, at least 300
    #[serde(rename = "interval-secs", default = "default_interval")]
    pub interval_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

/// Poll history configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Number of most recent polls to keep; older ones are pruned
    #[serde(rename = "keep-polls", default = "default_keep_polls")]
    pub keep_polls: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            session_cookie: default_session_cookie(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_id: default_server_id(),
            sort: default_sort(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

fn default_base_url() -> String {
    "https://galaxyharvester.net".to_string()
}

fn default_listing_path() -> String {
    "getResourceList.py".to_string()
}

fn default_session_cookie() -> String {
    "gh_sid".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_server_id() -> String {
    crate::fetch::DEFAULT_SERVER_ID.to_string()
}

fn default_sort() -> String {
    crate::resource::SortKey::default().client_name().to_string()
}

fn default_interval() -> u64 {
    crate::fetch::MIN_POLL_INTERVAL.as_secs()
}

fn default_agent_name() -> String {
    "harvest-watch".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_keep_polls() -> usize {
    100
}
