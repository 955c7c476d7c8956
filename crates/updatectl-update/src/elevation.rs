//! Privilege elevation for directory permission changes
//!
//! The only elevated operation is `chmod <mode> <dir>`. The command runs
//! with an argument vector, never through a shell.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{Result, UpdateError};

/// Elevation commands, in order of preference
pub const ELEVATION_COMMANDS: &[&str] = &["sudo", "doas"];

/// Runs a permission change with elevated privileges
pub trait Elevator: Send + Sync {
    /// `chmod mode path` as a privileged user
    fn chmod(&self, mode: &str, path: &Path) -> Result<()>;

    /// Name shown to the user
    fn name(&self) -> String;
}

/// `sudo` / `doas` found on PATH
#[derive(Debug, Clone)]
pub struct CommandElevator {
    program: PathBuf,
}

impl CommandElevator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// First available elevation command on PATH
    pub fn detect() -> Option<Self> {
        let found = ELEVATION_COMMANDS
            .iter()
            .find_map(|cmd| which::which(cmd).ok());
        match &found {
            Some(program) => debug!("Elevation command: {}", program.display()),
            None => debug!("No elevation command on PATH"),
        }
        found.map(Self::new)
    }
}

impl Elevator for CommandElevator {
    fn chmod(&self, mode: &str, path: &Path) -> Result<()> {
        let failed = |reason: String| UpdateError::ElevationFailed {
            mode: mode.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        if !is_octal_mode(mode) {
            return Err(failed("mode must be 3 or 4 octal digits".into()));
        }
        if !path.is_absolute() {
            return Err(failed("path must be absolute".into()));
        }

        info!("Running {} chmod {} {}", self.name(), mode, path.display());
        let status = Command::new(&self.program)
            .arg("chmod")
            .arg(mode)
            .arg(path)
            .status()
            .map_err(|e| failed(e.to_string()))?;

        if !status.success() {
            return Err(failed(format!("{} exited with {}", self.name(), status)));
        }
        Ok(())
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

fn is_octal_mode(mode: &str) -> bool {
    (3..=4).contains(&mode.len()) && mode.chars().all(|c| ('0'..='7').contains(&c))
}
