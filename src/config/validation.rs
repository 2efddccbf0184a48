use crate::config::types::{
    Config, PollConfig, SessionConfig, StorageConfig, UpstreamConfig, UserAgentConfig,
};
use crate::fetch::MIN_POLL_INTERVAL;
use crate::resource::SortKey;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_upstream_config(&config.upstream)?;
    validate_session_config(&config.session)?;
    validate_poll_config(&config.poll)?;
    validate_user_agent_config(&config.user_agent)?;
    if let Some(storage) = &config.storage {
        validate_storage_config(storage)?;
    }
    Ok(())
}

/// Validates upstream configuration
fn validate_upstream_config(config: &UpstreamConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.listing_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing_path cannot be empty".to_string(),
        ));
    }

    if config.session_cookie.is_empty()
        || config
            .session_cookie
            .chars()
            .any(|c| c == '=' || c == ';' || c.is_whitespace() || c.is_control())
    {
        return Err(ConfigError::Validation(format!(
            "session_cookie must be a non-empty cookie name, got '{}'",
            config.session_cookie
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the initial server/sort selection
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.server_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "server-id cannot be empty".to_string(),
        ));
    }

    config
        .sort
        .parse::<SortKey>()
        .map_err(ConfigError::Validation)?;
    Ok(())
}

/// Validates polling configuration
fn validate_poll_config(config: &PollConfig) -> Result<(), ConfigError> {
    if config.interval_secs < MIN_POLL_INTERVAL.as_secs() {
        return Err(ConfigError::Validation(format!(
            "interval_secs must be >= {}, got {}",
            MIN_POLL_INTERVAL.as_secs(),
            config.interval_secs
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.keep_polls < 1 {
        return Err(ConfigError::Validation(format!(
            "keep_polls must be >= 1, got {}",
            config.keep_polls
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.upstream.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));

        config.upstream.base_url = "ftp://galaxyharvester.net".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_http_base_url_allowed() {
        let mut config = Config::default();
        config.upstream.base_url = "http://127.0.0.1:8080".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_session_cookie_name() {
        let mut config = Config::default();
        for name in ["", "gh sid", "gh=sid", "gh;sid"] {
            config.upstream.session_cookie = name.to_string();
            assert!(validate(&config).is_err(), "cookie name {:?}", name);
        }
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.upstream.request_timeout_secs = 0;
        assert!(validate(&config).is_err());
        config.upstream.request_timeout_secs = 301;
        assert!(validate(&config).is_err());
        config.upstream.request_timeout_secs = 300;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_sort_key() {
        let mut config = Config::default();
        config.session.sort = "bad-sort".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_empty_server_id() {
        let mut config = Config::default();
        config.session.server_id = "  ".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));

        let result = crate::config::parse_config("[session]\nserver-id = \"\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_upstream_sort_name_accepted() {
        let mut config = Config::default();
        config.session.sort = "resName".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_poll_interval_floor() {
        let mut config = Config::default();
        config.poll.interval_secs = 60;
        assert!(validate(&config).is_err());
        config.poll.interval_secs = 300;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_user_agent_name() {
        let mut config = Config::default();
        config.user_agent.name = "harvest watch".to_string();
        assert!(validate(&config).is_err());
        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_storage_config() {
        let mut config = Config::default();
        config.storage = Some(StorageConfig {
            database_path: String::new(),
            keep_polls: 10,
        });
        assert!(validate(&config).is_err());

        config.storage = Some(StorageConfig {
            database_path: "./harvest.db".to_string(),
            keep_polls: 0,
        });
        assert!(validate(&config).is_err());

        config.storage = Some(StorageConfig {
            database_path: "./harvest.db".to_string(),
            keep_polls: 5,
        });
        assert!(validate(&config).is_ok());
    }
}
