//! Authentication probe

mod common;

use common::*;
use updatectl_update::auth::check_auth_required;
use updatectl_update::RepositoryClient;
use wiremock::MockServer;

async fn requires_auth(status: u16) -> bool {
    let server = MockServer::start().await;
    mock_auth_probe(&server, status).await;
    let client = RepositoryClient::new().unwrap();
    check_auth_required(&client, &repo_url(&server)).await
}

#[tokio::test]
async fn test_unauthorized_requires_auth() {
    assert!(requires_auth(401).await);
}

#[tokio::test]
async fn test_forbidden_requires_auth() {
    assert!(requires_auth(403).await);
}

#[tokio::test]
async fn test_ok_does_not_require_auth() {
    assert!(!requires_auth(200).await);
}

#[tokio::test]
async fn test_other_statuses_do_not_require_auth() {
    assert!(!requires_auth(404).await);
    assert!(!requires_auth(500).await);
}

#[tokio::test]
async fn test_unreachable_server_does_not_require_auth() {
    // Nothing listens on port 1
    let client = RepositoryClient::new().unwrap();
    assert!(!check_auth_required(&client, "http://127.0.0.1:1/repo").await);
}
