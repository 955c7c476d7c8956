//! Error types for updatectl-core

use thiserror::Error;

/// Unsupported host platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Operating system is not one we publish binaries for
    #[error("Unsupported operating system: {os}")]
    UnsupportedOs { os: String },

    /// Architecture is not one we publish binaries for
    #[error("Unsupported architecture: {arch}")]
    UnsupportedArch { arch: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML config: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// Missing required field
    #[error("Field '{field}' is required and cannot be empty")]
    MissingField { field: String },
}

impl ConfigError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// URL template errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template failed to parse or render
    #[error("Failed to render URL template '{template}': {message}")]
    Render { template: String, message: String },

    /// Rendered URL is not usable
    #[error("Invalid URL generated from template: {reason}")]
    InvalidUrl { reason: String },
}

impl TemplateError {
    pub(crate) fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }
}
