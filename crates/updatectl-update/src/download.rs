//! Binary download with progress tracking
//!
//! Streams the platform binary for a given version into a caller-chosen
//! temp path and marks it executable. The status code is checked before the
//! destination file is created, so a 401 or 404 leaves nothing behind.

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use updatectl_core::{render_url, TemplateVars};

use crate::client::RepositoryClient;
use crate::error::{Result, UpdateError};

/// Outcome of a completed download
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub url: String,
}

/// Fetches release binaries from the repository
pub struct BinaryDownloader<'a> {
    client: &'a RepositoryClient,
    template: &'a str,
    vars: &'a TemplateVars,
    show_progress: bool,
}

impl<'a> BinaryDownloader<'a> {
    pub fn new(client: &'a RepositoryClient, template: &'a str, vars: &'a TemplateVars) -> Self {
        Self {
            client,
            template,
            vars,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Binary URL for `version` on this platform
    pub fn binary_url(&self, version: &str) -> Result<String> {
        let vars = self.vars.clone().with_version(version);
        Ok(render_url(self.template, &vars)?)
    }

    /// Download `version` to `dest` and add execute bits
    pub async fn download(&self, version: &str, dest: &Path) -> Result<DownloadResult> {
        let url = self.binary_url(version)?;
        info!("Downloading {} from {}", version, url);

        let response = self.client.get(&url).await?;
        let total_size = response.content_length();

        let mut file = File::create(dest).map_err(|e| UpdateError::fs("create", dest, e))?;

        let pb = self.progress_bar(total_size);
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UpdateError::http(&url, e))?;
            file.write_all(&chunk)
                .map_err(|e| UpdateError::fs("write", dest, e))?;
            downloaded += chunk.len() as u64;
            if let Some(pb) = &pb {
                pb.set_position(downloaded);
            }
        }

        file.sync_all()
            .map_err(|e| UpdateError::fs("sync", dest, e))?;
        drop(file);

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        make_executable(dest)?;
        debug!("Downloaded {} bytes to {}", downloaded, dest.display());

        Ok(DownloadResult {
            file_path: dest.to_path_buf(),
            file_size: downloaded,
            url,
        })
    }

    fn progress_bar(&self, total_size: Option<u64>) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = match total_size {
            Some(size) => {
                let pb = ProgressBar::new(size);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.green} {bytes} ({bytes_per_sec})")
                {
                    pb.set_style(style);
                }
                pb
            }
        };
        Some(pb)
    }
}

/// Add user, group and other execute bits
fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| UpdateError::fs("stat", path, e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms).map_err(|e| UpdateError::fs("chmod", path, e))
}
