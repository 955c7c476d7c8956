//! Location of the executable being replaced

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, UpdateError};

/// Paths derived once per run from the running executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Executable that gets replaced (symlinks resolved)
    pub final_path: PathBuf,
    /// Directory holding `final_path`
    pub directory: PathBuf,
    /// Base name of `final_path`
    pub file_name: String,
    /// Per-run download location in the temp directory
    pub temp_download_path: PathBuf,
}

impl InstallTarget {
    /// Target for the currently running executable
    pub fn current_exe(temp_dir: &Path) -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| UpdateError::fs("locate", Path::new("current executable"), e))?;
        Self::from_path(&exe, temp_dir)
    }

    /// Target for an arbitrary executable path, downloading into `temp_dir`
    pub fn from_path(executable: &Path, temp_dir: &Path) -> Result<Self> {
        let final_path = resolve_symlink(executable)?;

        let directory = final_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| not_a_file(&final_path))?;
        let file_name = final_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| not_a_file(&final_path))?;

        let temp_download_path = temp_dir.join(format!("{}-{}", file_name, Uuid::new_v4()));
        debug!(
            "Install target {} (download to {})",
            final_path.display(),
            temp_download_path.display()
        );

        Ok(Self {
            final_path,
            directory,
            file_name,
            temp_download_path,
        })
    }
}

/// Follow `path` if it is a symlink, otherwise return it unchanged
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    let meta = fs::symlink_metadata(path).map_err(|e| UpdateError::fs("stat", path, e))?;
    if meta.file_type().is_symlink() {
        let resolved = fs::canonicalize(path).map_err(|e| UpdateError::fs("resolve", path, e))?;
        debug!("{} links to {}", path.display(), resolved.display());
        Ok(resolved)
    } else {
        Ok(path.to_path_buf())
    }
}

fn not_a_file(path: &Path) -> UpdateError {
    UpdateError::fs(
        "derive install directory from",
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
    )
}
