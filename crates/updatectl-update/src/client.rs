//! HTTP access to the release repository

use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use updatectl_secrets::Credentials;

use crate::error::{Result, UpdateError};

/// Thin wrapper over [`reqwest::Client`] that attaches basic auth and maps
/// status codes onto [`UpdateError`]
#[derive(Clone)]
pub struct RepositoryClient {
    client: Client,
    credentials: Option<Credentials>,
}

impl RepositoryClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::user_agent())
            .build()
            .map_err(UpdateError::Client)?;

        Ok(Self {
            client,
            credentials: None,
        })
    }

    /// Attach credentials to every subsequent GET
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Unauthenticated HEAD, used to detect whether the repository wants auth
    pub async fn head(&self, url: &str) -> std::result::Result<StatusCode, reqwest::Error> {
        let response = self.client.head(url).send().await?;
        Ok(response.status())
    }

    /// GET `url` and fail on anything but 200
    pub async fn get(&self, url: &str) -> Result<Response> {
        let mut request = self.client.get(url);
        if let Some(creds) = &self.credentials {
            debug!("GET {} as {}", url, creds.username);
            request = request.basic_auth(&creds.username, Some(creds.password.as_str()));
        } else {
            debug!("GET {}", url);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpdateError::http(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(classify_status(response.status(), url));
        }

        Ok(response)
    }
}

/// Map a non-200 status to the matching error
pub fn classify_status(status: StatusCode, url: &str) -> UpdateError {
    match status {
        StatusCode::UNAUTHORIZED => UpdateError::InvalidCredentials {
            url: url.to_string(),
        },
        StatusCode::NOT_FOUND => UpdateError::MissingArtifact {
            url: url.to_string(),
        },
        other => UpdateError::RequestFailed {
            status: other.as_u16(),
            url: url.to_string(),
        },
    }
}
