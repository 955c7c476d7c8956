//! # updatectl-core
//!
//! Core library for updatectl providing:
//! - Update configuration parsing (YAML) and validation
//! - Host platform detection and mapping to release naming
//! - URL template rendering with validation of the result

pub mod config;
pub mod error;
pub mod platform;
pub mod template;

pub use config::{
    ConfigLoader, ConfigOverrides, UpdateConfig, DEFAULT_BIN_TEMPLATE, DEFAULT_PINNED_RELEASE_TEMPLATE,
};
pub use error::{ConfigError, PlatformError, TemplateError};
pub use platform::{Arch, Os, PlatformInfo};
pub use template::{render_url, validate_url, TemplateVars};
