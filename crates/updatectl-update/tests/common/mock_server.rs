//! Wiremock helpers for the release repository

use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Repository base URL on `server`
pub fn repo_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), REPO_PATH)
}

/// HEAD on the repository answers with `status`
pub async fn mock_auth_probe(server: &MockServer, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(REPO_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Stable release file returns `body`
pub async fn mock_stable_release(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(RELEASE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Stable release file returns `status` with no body
pub async fn mock_stable_release_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(RELEASE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Binary for `version` returns `content`, and must be fetched `times` times
pub async fn mock_binary(server: &MockServer, version: &str, content: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(binary_path(version)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(times)
        .mount(server)
        .await;
}

/// Binary for `version` answers with `status`
pub async fn mock_binary_status(server: &MockServer, version: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(binary_path(version)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Protected repository: HEAD is 401, GETs succeed only with the test credentials
pub async fn mock_protected_repository(server: &MockServer, version: &str, content: &[u8]) {
    mock_auth_probe(server, 401).await;

    Mock::given(method("GET"))
        .and(path(RELEASE_PATH))
        .and(basic_auth(USERNAME, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", version)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(binary_path(version)))
        .and(basic_auth(USERNAME, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(server)
        .await;

    // Anything without credentials is rejected
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Number of requests the server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
