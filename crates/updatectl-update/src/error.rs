//! Update pipeline errors
//!
//! Every variant is terminal for the current run; nothing is retried.

use std::path::{Path, PathBuf};
use thiserror::Error;
use updatectl_core::{ConfigError, PlatformError, TemplateError};
use updatectl_secrets::SecretStoreError;

pub type Result<T> = std::result::Result<T, UpdateError>;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Credential store error: {0}")]
    SecretStore(#[from] SecretStoreError),

    /// 401 from an authenticated request
    #[error("HTTP 401: Unauthorized. Credentials for {url} seem to be invalid")]
    InvalidCredentials { url: String },

    /// 404 from the release or binary lookup
    #[error("HTTP 404: Not Found. {url} does not exist")]
    MissingArtifact { url: String },

    /// Any other non-200 response
    #[error("HTTP {status}: request to {url} failed")]
    RequestFailed { status: u16, url: String },

    #[error("Release server returned an empty version from {url}")]
    EmptyVersion { url: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure (connection, TLS, body read)
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory {} is not writable and no elevation command was found (tried {tried})", .path.display())]
    ElevationUnavailable { path: PathBuf, tried: String },

    #[error("Elevated `chmod {mode} {}` failed: {reason}", .path.display())]
    ElevationFailed {
        mode: String,
        path: PathBuf,
        reason: String,
    },
}

impl UpdateError {
    pub(crate) fn fs(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }
}
