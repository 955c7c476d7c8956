//! Self-update pipeline for updatectl
//!
//! Provides:
//! - Authentication probing and credential resolution
//! - Pinned stable release lookup
//! - Streaming binary download to a per-run temp file
//! - Atomic replacement of the running executable, with sudo/doas
//!   elevation when its directory is not writable
//! - Temp file cleanup and error reporting on failure

#[cfg(not(unix))]
compile_error!("updatectl-update supports unix targets only");

pub mod auth;
pub mod client;
pub mod download;
pub mod elevation;
pub mod error;
pub mod installer;
pub mod release;
pub mod report;
pub mod target;
pub mod updater;

pub use client::RepositoryClient;
pub use download::{BinaryDownloader, DownloadResult};
pub use elevation::{CommandElevator, Elevator};
pub use error::UpdateError;
pub use installer::{InstallMode, Installer};
pub use release::{ReleaseLocator, VersionSelector};
pub use report::{Reporter, TracingReporter};
pub use target::InstallTarget;
pub use updater::{UpdateOptions, UpdateResult, Updater};

/// Current CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("updatectl/{}", VERSION)
}
