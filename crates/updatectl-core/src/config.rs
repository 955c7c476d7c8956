//! Update configuration loading
//!
//! Configuration is resolved with the following precedence:
//! 1. An explicit config file (`--config`), used as the whole configuration
//! 2. Otherwise CLI/environment overrides, applied over the user config
//!    (`<config dir>/updatectl/config.yaml`), applied over the defaults
//!    compiled into the binary
//! 3. Built-in templates for any template left empty
//!
//! Compiled-in defaults come from two build-time environment variables:
//! `UPDATECTL_DEFAULT_CONFIG` holds a whole YAML document and
//! `UPDATECTL_DEFAULT_REPOSITORY_URL` sets only the repository URL.
//!
//! The resolved value is passed explicitly to the update pipeline.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Default template for the pinned stable release endpoint
pub const DEFAULT_PINNED_RELEASE_TEMPLATE: &str = "{{ url }}/stable_release";

/// Default template for the binary download URL
pub const DEFAULT_BIN_TEMPLATE: &str =
    "{{ url }}/{{ version }}/{{ app }}_{{ os }}_{{ arch }}{{ ext }}";

/// YAML document embedded at build time
const EMBEDDED_CONFIG: Option<&str> = option_env!("UPDATECTL_DEFAULT_CONFIG");

/// Repository URL embedded at build time
const EMBEDDED_REPOSITORY_URL: Option<&str> = option_env!("UPDATECTL_DEFAULT_REPOSITORY_URL");

/// Settings for the update pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Repository base URL
    #[serde(default)]
    pub repository_url: String,

    /// Template for the pinned stable release endpoint
    #[serde(default, rename = "pinned_release_file")]
    pub pinned_release: String,

    /// Template for the binary download URL
    #[serde(default)]
    pub bin_mask: String,

    /// Application name used in templates
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub app_name: String,
}

impl UpdateConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Parse an embedded default document.
    /// A document that fails to parse or validate yields an empty config.
    pub fn from_yaml_lenient(content: &str) -> Self {
        match Self::from_yaml(content).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse default config, ignoring it: {}", e);
                Self::default()
            }
        }
    }

    /// Defaults compiled into the binary
    pub fn builtin() -> Self {
        Self::embedded(EMBEDDED_CONFIG, EMBEDDED_REPOSITORY_URL)
    }

    fn embedded(document: Option<&str>, repository_url: Option<&str>) -> Self {
        let mut config = document.map(Self::from_yaml_lenient).unwrap_or_default();
        if let Some(url) = repository_url.map(str::trim).filter(|url| !url.is_empty()) {
            config.repository_url = url.to_string();
        }
        config
    }

    /// Read and parse a YAML config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Fill empty templates and app name with built-in defaults
    pub fn with_defaults(mut self, app_name: &str) -> Self {
        if self.pinned_release.trim().is_empty() {
            self.pinned_release = DEFAULT_PINNED_RELEASE_TEMPLATE.to_string();
        }
        if self.bin_mask.trim().is_empty() {
            self.bin_mask = DEFAULT_BIN_TEMPLATE.to_string();
        }
        if self.app_name.trim().is_empty() {
            self.app_name = app_name.to_string();
        }
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository_url.trim().is_empty() {
            return Err(ConfigError::missing_field("repository_url"));
        }
        Ok(())
    }

    /// Replace fields with the non-empty fields of `upper`
    fn overlay(&mut self, upper: UpdateConfig) {
        let fields = [
            (&mut self.repository_url, upper.repository_url),
            (&mut self.pinned_release, upper.pinned_release),
            (&mut self.bin_mask, upper.bin_mask),
            (&mut self.app_name, upper.app_name),
        ];
        for (field, value) in fields {
            if !value.trim().is_empty() {
                *field = value;
            }
        }
    }

    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = non_empty(&overrides.repository_url) {
            self.repository_url = url.to_string();
        }
        if let Some(tpl) = non_empty(&overrides.pinned_release) {
            self.pinned_release = tpl.to_string();
        }
        if let Some(tpl) = non_empty(&overrides.bin_mask) {
            self.bin_mask = tpl.to_string();
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repository_url: Option<String>,
    pub pinned_release: Option<String>,
    pub bin_mask: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves the effective [`UpdateConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    defaults: UpdateConfig,
    user_config: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader with the compiled-in defaults and the user config from the
    /// platform config directory
    pub fn new() -> Self {
        Self {
            defaults: UpdateConfig::builtin(),
            user_config: dirs::config_dir().map(|dir| dir.join("updatectl").join("config.yaml")),
        }
    }

    /// Loader with a custom user config path and no defaults
    pub fn with_user_config(path: impl Into<PathBuf>) -> Self {
        Self {
            defaults: UpdateConfig::default(),
            user_config: Some(path.into()),
        }
    }

    /// Loader that ignores any user config and has no defaults
    pub fn without_user_config() -> Self {
        Self {
            defaults: UpdateConfig::default(),
            user_config: None,
        }
    }

    /// Use `defaults` as the lowest layer
    pub fn with_base(mut self, defaults: UpdateConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve the configuration
    pub fn load(
        &self,
        external: Option<&Path>,
        overrides: &ConfigOverrides,
        app_name: &str,
    ) -> Result<UpdateConfig, ConfigError> {
        let config = match external {
            Some(path) => {
                debug!("Using external config file: {}", path.display());
                UpdateConfig::from_path(path)?
            }
            None => {
                let mut config = self.defaults.clone();
                if let Some(path) = self.user_config.as_deref().filter(|p| p.exists()) {
                    debug!("Loading user config: {}", path.display());
                    config.overlay(UpdateConfig::from_path(path)?);
                }
                config.apply(overrides);
                config
            }
        };

        let config = config.with_defaults(app_name);
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
