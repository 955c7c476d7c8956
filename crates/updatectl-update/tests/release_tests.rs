//! Version resolution against a mock repository

mod common;

use common::*;
use updatectl_core::DEFAULT_PINNED_RELEASE_TEMPLATE;
use updatectl_secrets::Credentials;
use updatectl_update::{ReleaseLocator, RepositoryClient, UpdateError, VersionSelector};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_latest_stable_is_trimmed() {
    let server = MockServer::start().await;
    mock_stable_release(&server, "  v2.3.0\n").await;

    let client = RepositoryClient::new().unwrap();
    let vars = test_vars(&repo_url(&server));
    let version = ReleaseLocator::new(&client, DEFAULT_PINNED_RELEASE_TEMPLATE, &vars)
        .resolve(&VersionSelector::LatestStable)
        .await
        .unwrap();

    assert_eq!(version, NEXT_VERSION);
}

#[tokio::test]
async fn test_explicit_version_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("v9.9.9"))
        .expect(0)
        .mount(&server)
        .await;

    let client = RepositoryClient::new().unwrap();
    let vars = test_vars(&repo_url(&server));
    let version = ReleaseLocator::new(&client, DEFAULT_PINNED_RELEASE_TEMPLATE, &vars)
        .resolve(&VersionSelector::Explicit("v1.0.0".into()))
        .await
        .unwrap();

    assert_eq!(version, "v1.0.0");
}

async fn release_error(status: u16) -> UpdateError {
    let server = MockServer::start().await;
    mock_stable_release_status(&server, status).await;

    let client = RepositoryClient::new().unwrap();
    let vars = test_vars(&repo_url(&server));
    ReleaseLocator::new(&client, DEFAULT_PINNED_RELEASE_TEMPLATE, &vars)
        .resolve(&VersionSelector::LatestStable)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_unauthorized_release_is_invalid_credentials() {
    let err = release_error(401).await;
    assert!(matches!(err, UpdateError::InvalidCredentials { .. }));
    assert!(err.to_string().contains("seem to be invalid"));
}

#[tokio::test]
async fn test_missing_release_file() {
    let err = release_error(404).await;
    assert!(matches!(err, UpdateError::MissingArtifact { ref url } if url.ends_with(RELEASE_PATH)));
}

#[tokio::test]
async fn test_server_error_is_request_failure() {
    let err = release_error(500).await;
    assert!(matches!(err, UpdateError::RequestFailed { status: 500, .. }));
}

#[tokio::test]
async fn test_empty_release_file_is_rejected() {
    let server = MockServer::start().await;
    mock_stable_release(&server, " \n").await;

    let client = RepositoryClient::new().unwrap();
    let vars = test_vars(&repo_url(&server));
    let err = ReleaseLocator::new(&client, DEFAULT_PINNED_RELEASE_TEMPLATE, &vars)
        .resolve(&VersionSelector::LatestStable)
        .await
        .unwrap_err();

    assert!(matches!(err, UpdateError::EmptyVersion { .. }));
}

#[tokio::test]
async fn test_credentials_are_sent_as_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELEASE_PATH))
        .and(basic_auth(USERNAME, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEXT_VERSION))
        .expect(1)
        .mount(&server)
        .await;

    let url = repo_url(&server);
    let client = RepositoryClient::new()
        .unwrap()
        .with_credentials(Some(Credentials::new(&url, USERNAME, PASSWORD)));
    let vars = test_vars(&url);
    let version = ReleaseLocator::new(&client, DEFAULT_PINNED_RELEASE_TEMPLATE, &vars)
        .resolve(&VersionSelector::LatestStable)
        .await
        .unwrap();

    assert_eq!(version, NEXT_VERSION);
}

#[tokio::test]
async fn test_custom_release_template() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repo/channels/updatectl/linux"))
        .respond_with(ResponseTemplate::new(200).set_body_string("v3.0.0"))
        .mount(&server)
        .await;

    let client = RepositoryClient::new().unwrap();
    let vars = test_vars(&repo_url(&server));
    let version = ReleaseLocator::new(&client, "{{ url }}/channels/{{ app }}/{{ os }}", &vars)
        .resolve(&VersionSelector::LatestStable)
        .await
        .unwrap();

    assert_eq!(version, "v3.0.0");
}
