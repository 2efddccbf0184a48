//! Integration tests for the fetch cycle
//!
//! These tests use wiremock to stand in for the Galaxy Harvester listing
//! endpoint and drive the real HTTP transport through the coordinator.

use harvest_watch::config::{UpstreamConfig, UserAgentConfig};
use harvest_watch::fetch::{FetchCoordinator, HttpTransport, TransportError};
use harvest_watch::FetchError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESOURCE_LIST: &str = include_str!("../fixtures/resource_list.html");

/// Creates a coordinator pointed at the mock server
fn coordinator_for(server: &MockServer, timeout_secs: u64) -> FetchCoordinator<HttpTransport> {
    let upstream = UpstreamConfig {
        base_url: server.uri(),
        request_timeout_secs: timeout_secs,
        ..UpstreamConfig::default()
    };
    let user_agent = UserAgentConfig {
        name: "TestWatch".to_string(),
        version: "1.0.0".to_string(),
    };
    let transport = HttpTransport::new(&upstream, &user_agent).expect("Failed to build transport");
    FetchCoordinator::new(transport)
}

#[tokio::test]
async fn test_fetch_posts_listing_form_with_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getResourceList.py"))
        .and(header("cookie", "gh_sid=abc123"))
        .and(header("user-agent", "TestWatch/1.0.0"))
        .and(body_string_contains("galaxy=118"))
        .and(body_string_contains("sort=timeEntered"))
        .and(body_string_contains("planetSel=any"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_LIST))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    let outcome = coordinator.fetch("abc123").await.unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[0].name, "Aszolite");
    assert!(!outcome.warnings.is_empty());
    assert_eq!(
        coordinator.session().last_fetched_at(),
        Some(outcome.fetched_at)
    );
}

#[tokio::test]
async fn test_configure_changes_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getResourceList.py"))
        .and(body_string_contains("galaxy=42"))
        .and(body_string_contains("sort=resName"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_LIST))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    coordinator.configure("42", "by-name").unwrap();
    coordinator.fetch("abc123").await.unwrap();
}

#[tokio::test]
async fn test_invalid_sort_keeps_previous_configuration() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("galaxy=7"))
        .and(body_string_contains("sort=resType"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_LIST))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    coordinator.configure("7", "by-category").unwrap();

    let err = coordinator.configure("9", "by-price").unwrap_err();
    assert!(matches!(err, FetchError::InvalidConfig(_)));

    coordinator.fetch("abc123").await.unwrap();
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_LIST))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    let err = coordinator.fetch("   ").await.unwrap_err();

    assert!(matches!(err, FetchError::Unauthenticated(_)));
    assert!(coordinator.session().last_fetched_at().is_none());
}

#[tokio::test]
async fn test_forbidden_is_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    let err = coordinator.fetch("expired").await.unwrap_err();

    assert!(matches!(err, FetchError::Unauthenticated(_)));
    assert_eq!(err.user_message(), "Please log in to Galaxy Harvester again");
}

#[tokio::test]
async fn test_server_error_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    let err = coordinator.fetch("abc123").await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport(TransportError::Status { status: 500 })
    ));
    assert!(err.is_retryable());
    assert!(coordinator.session().last_fetched_at().is_none());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESOURCE_LIST)
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 1);
    let err = coordinator.fetch("abc123").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn test_unrecognized_page_is_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Site maintenance</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let mut coordinator = coordinator_for(&mock_server, 5);
    let err = coordinator.fetch("abc123").await.unwrap_err();

    assert!(matches!(err, FetchError::Upstream(_)));
    assert!(coordinator.session().last_fetched_at().is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_transport() {
    let mock_server = MockServer::start().await;
    let mut coordinator = coordinator_for(&mock_server, 5);
    drop(mock_server);

    let err = coordinator.fetch("abc123").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
