//! Version information for the updatectl CLI

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Version string compared against the release repository
    pub version: String,

    /// Target triple, when set at build time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    pub os: &'static str,
    pub arch: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: format!("v{}", updatectl_update::VERSION),
            target: option_env!("TARGET").map(String::from),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    pub fn display(&self) -> String {
        format!("updatectl {} ({}/{})", self.version, self.os, self.arch)
    }
}
