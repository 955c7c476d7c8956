//! Secret store errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretStoreError {
    /// The store exists but cannot be decrypted or parsed.
    /// Distinct from a missing entry, which is `Ok(None)`.
    #[error("Secret store {path} is malformed or the passphrase is wrong: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Secret store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encrypt secret store: {0}")]
    Encrypt(String),

    #[error("Failed to serialize secret store: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),

    #[error("Failed to read input: {0}")]
    Prompt(String),

    #[error("Username and password are required for {url}")]
    EmptyCredentials { url: String },
}

impl SecretStoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when the store could not be decrypted or parsed
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl From<dialoguer::Error> for SecretStoreError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}
