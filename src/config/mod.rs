//! Configuration module for Harvest-Watch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The session token is not part of the configuration; it comes from the
//! command line or the `GH_SID` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use harvest_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Polling every {}s", config.poll.interval_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, PollConfig, SessionConfig, StorageConfig, UpstreamConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
