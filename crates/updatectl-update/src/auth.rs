//! Authentication probe

use reqwest::StatusCode;
use tracing::debug;

use crate::client::RepositoryClient;

/// Whether the repository at `url` demands credentials.
///
/// Sends one unauthenticated HEAD. Only 401 and 403 mean yes. A transport
/// failure or any other status means no; a later authenticated request
/// surfaces the real problem if there is one.
pub async fn check_auth_required(client: &RepositoryClient, url: &str) -> bool {
    match client.head(url).await {
        Ok(StatusCode::UNAUTHORIZED) | Ok(StatusCode::FORBIDDEN) => {
            debug!("{} requires authentication", url);
            true
        }
        Ok(status) => {
            debug!("HEAD {} returned {}, assuming no auth", url, status);
            false
        }
        Err(e) => {
            debug!("HEAD {} failed ({}), assuming no auth", url, e);
            false
        }
    }
}
