//! Host platform detection
//!
//! Maps the running OS and CPU architecture onto the names used by the
//! release server. Anything outside the supported set is an error, never a
//! silent default.

use std::fmt;

use tracing::debug;

use crate::error::PlatformError;

/// Raw architecture identifiers and the alias the release server uses for them.
/// Identifiers missing from this table are passed through unchanged.
const ARCH_ALIASES: &[(&str, &str)] = &[
    ("amd64", "x86_64"),
    ("x86", "i386"),
    ("i686", "i386"),
    ("386", "i386"),
    ("aarch64", "arm64"),
];

/// Supported operating systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
}

impl Os {
    /// Name used in release URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }

    /// Executable file extension for this OS
    pub fn extension(&self) -> &'static str {
        ""
    }

    fn from_raw(raw: &str) -> Result<Self, PlatformError> {
        match raw {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Darwin),
            other => Err(PlatformError::UnsupportedOs {
                os: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported CPU architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    I386,
    Arm64,
}

impl Arch {
    /// Name used in release URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::I386 => "i386",
            Arch::Arm64 => "arm64",
        }
    }

    fn from_raw(raw: &str) -> Result<Self, PlatformError> {
        match map_arch(raw) {
            "x86_64" => Ok(Arch::X86_64),
            "i386" => Ok(Arch::I386),
            "arm64" => Ok(Arch::Arm64),
            _ => Err(PlatformError::UnsupportedArch {
                arch: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the release server alias for a raw architecture identifier
pub fn map_arch(raw: &str) -> &str {
    ARCH_ALIASES
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| *to)
        .unwrap_or(raw)
}

/// Detected host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformInfo {
    /// Detect the platform this binary was built for
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_raw(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build platform info from raw OS and architecture identifiers
    pub fn from_raw(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let platform = Self {
            os: Os::from_raw(os)?,
            arch: Arch::from_raw(arch)?,
        };
        debug!(
            "Detected platform: {}-{} -> {}/{}",
            os, arch, platform.os, platform.arch
        );
        Ok(platform)
    }

    /// Executable extension for the detected OS
    pub fn extension(&self) -> &'static str {
        self.os.extension()
    }
}
