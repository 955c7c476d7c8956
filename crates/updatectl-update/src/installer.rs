//! Executable replacement
//!
//! The new binary is copied to a `.tmp` sibling of the final path, synced,
//! given mode 0755 and renamed over the final path. The rename is the last
//! visible step, so the final path always holds either the old or the new
//! binary. When the target directory is not writable, its mode is opened up
//! with an elevated `chmod 0777` for the duration of the copy and restored
//! afterwards whether or not the copy succeeded.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::elevation::{Elevator, ELEVATION_COMMANDS};
use crate::error::{Result, UpdateError};
use crate::target::InstallTarget;

/// Mode given to the installed binary
const INSTALLED_MODE: u32 = 0o755;

/// Mode the target directory is opened to during an elevated install
const OPEN_DIRECTORY_MODE: &str = "0777";

/// How the binary was put in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Direct,
    Elevated,
}

/// Replaces the executable at an [`InstallTarget`]
pub struct Installer<'a> {
    target: &'a InstallTarget,
    elevator: Option<&'a dyn Elevator>,
}

impl<'a> Installer<'a> {
    pub fn new(target: &'a InstallTarget, elevator: Option<&'a dyn Elevator>) -> Self {
        Self { target, elevator }
    }

    /// Move the downloaded binary into place
    pub fn install(&self) -> Result<InstallMode> {
        let dir = &self.target.directory;
        if directory_writable(dir)? {
            debug!("{} is writable, installing directly", dir.display());
            self.copy_into_place()?;
            return Ok(InstallMode::Direct);
        }

        let elevator = self.elevator.ok_or_else(|| UpdateError::ElevationUnavailable {
            path: dir.clone(),
            tried: ELEVATION_COMMANDS.join(", "),
        })?;
        info!(
            "{} is not writable, using {} to install",
            dir.display(),
            elevator.name()
        );
        self.with_open_directory(elevator, || self.copy_into_place())?;
        Ok(InstallMode::Elevated)
    }

    fn copy_into_place(&self) -> Result<()> {
        let source = &self.target.temp_download_path;
        let mut reader = File::open(source).map_err(|e| UpdateError::fs("open", source, e))?;
        self.replace_from(&mut reader)
    }

    /// Open the target directory, run `install`, then restore its mode
    fn with_open_directory<F>(&self, elevator: &dyn Elevator, install: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let dir = &self.target.directory;
        let original = directory_mode(dir)?;

        elevator.chmod(OPEN_DIRECTORY_MODE, dir)?;
        let installed = install();
        let restored = elevator.chmod(&original, dir);

        match (installed, restored) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_err)) => {
                warn!(
                    "Could not restore mode {} on {}: {}",
                    original,
                    dir.display(),
                    restore_err
                );
                Err(e)
            }
        }
    }

    /// Copy `reader` to the staging file and rename it over the final path
    fn replace_from<R: Read>(&self, reader: &mut R) -> Result<()> {
        let final_path = &self.target.final_path;
        let staging = staging_path(final_path);

        let result = write_staged(reader, &staging).and_then(|()| {
            fs::rename(&staging, final_path).map_err(|e| UpdateError::fs("rename", &staging, e))
        });

        if result.is_err() && staging.symlink_metadata().is_ok() {
            if let Err(e) = fs::remove_file(&staging) {
                warn!("Failed to remove {}: {}", staging.display(), e);
            }
        }
        result?;

        info!("Installed {}", final_path.display());
        Ok(())
    }
}

/// Write `reader` to a freshly created staging file.
/// A leftover entry is unlinked first and the open uses O_EXCL, so a planted
/// symlink is never followed.
fn write_staged<R: Read>(reader: &mut R, staging: &Path) -> Result<()> {
    match fs::remove_file(staging) {
        Ok(()) => debug!("Removed stale {}", staging.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(UpdateError::fs("remove stale", staging, e)),
    }

    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(INSTALLED_MODE)
        .open(staging)
        .map_err(|e| UpdateError::fs("create", staging, e))?;

    io::copy(reader, &mut out).map_err(|e| UpdateError::fs("write", staging, e))?;
    out.sync_all()
        .map_err(|e| UpdateError::fs("sync", staging, e))?;
    drop(out);

    fs::set_permissions(staging, fs::Permissions::from_mode(INSTALLED_MODE))
        .map_err(|e| UpdateError::fs("chmod", staging, e))
}

/// `<final>.tmp` next to the final path
fn staging_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Permission bits of `dir` as a 4-digit octal string
fn directory_mode(dir: &Path) -> Result<String> {
    let meta = fs::metadata(dir).map_err(|e| UpdateError::fs("stat", dir, e))?;
    Ok(format!("{:04o}", meta.permissions().mode() & 0o7777))
}

/// Whether the current user can create files in `dir`
fn directory_writable(dir: &Path) -> Result<bool> {
    let meta = fs::metadata(dir).map_err(|e| UpdateError::fs("stat", dir, e))?;
    Ok(can_write(
        meta.mode(),
        meta.uid(),
        meta.gid(),
        users::get_current_uid(),
        &current_group_ids(),
    ))
}

/// Owner-write for the owner, or group-write for any member of the group.
/// Other-write bits are not considered.
fn can_write(mode: u32, owner: u32, group: u32, uid: u32, groups: &[u32]) -> bool {
    let owner_writable = mode & 0o200 != 0;
    let group_writable = mode & 0o020 != 0;
    (uid == owner && owner_writable) || (group_writable && groups.contains(&group))
}

fn current_group_ids() -> Vec<u32> {
    let mut ids = vec![users::get_current_gid()];
    if let Some(user) = users::get_user_by_uid(users::get_current_uid()) {
        if let Some(groups) = users::get_user_groups(user.name(), user.primary_group_id()) {
            ids.extend(groups.iter().map(|g| g.gid()));
        }
    }
    ids
}
