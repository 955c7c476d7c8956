//! The update pipeline
//!
//! One run goes: platform check, install target, auth probe, credentials,
//! version lookup, up-to-date check, download, install. Each step runs only
//! after the previous one succeeded. Whatever happens, the per-run temp file
//! is removed before [`Updater::run`] returns.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use updatectl_core::{validate_url, PlatformInfo, TemplateVars, UpdateConfig};
use updatectl_secrets::{CredentialResolver, Credentials, Prompter, SecretStore};

use crate::auth::check_auth_required;
use crate::client::RepositoryClient;
use crate::download::BinaryDownloader;
use crate::elevation::{CommandElevator, Elevator};
use crate::error::Result;
use crate::installer::{InstallMode, Installer};
use crate::release::{ReleaseLocator, VersionSelector};
use crate::report::{Reporter, TracingReporter};
use crate::target::InstallTarget;

/// Per-run choices from the command line
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub selector: VersionSelector,
    /// Credentials given on the command line; bypass the secret store
    pub credentials: Option<Credentials>,
    pub show_progress: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            selector: VersionSelector::LatestStable,
            credentials: None,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Resolved version equals the running one; nothing was downloaded
    AlreadyUpToDate { version: String },
    Updated {
        from: String,
        to: String,
        path: PathBuf,
        mode: InstallMode,
    },
}

/// Drives a self-update of the running executable
pub struct Updater {
    config: UpdateConfig,
    client: RepositoryClient,
    store: Box<dyn SecretStore>,
    prompter: Arc<dyn Prompter>,
    reporter: Arc<dyn Reporter>,
    elevator: Option<Arc<dyn Elevator>>,
    host_os: String,
    host_arch: String,
    executable: Option<PathBuf>,
    temp_dir: PathBuf,
    current_version: String,
}

impl Updater {
    /// Updater for this process: host platform, current executable, system
    /// temp dir and the first elevation command found on PATH
    pub fn new(
        config: UpdateConfig,
        store: Box<dyn SecretStore>,
        prompter: Arc<dyn Prompter>,
    ) -> Result<Self> {
        let elevator = CommandElevator::detect().map(|e| Arc::new(e) as Arc<dyn Elevator>);

        Ok(Self {
            config,
            client: RepositoryClient::new()?,
            store,
            prompter,
            reporter: Arc::new(TracingReporter),
            elevator,
            host_os: std::env::consts::OS.to_string(),
            host_arch: std::env::consts::ARCH.to_string(),
            executable: None,
            temp_dir: std::env::temp_dir(),
            current_version: format!("v{}", crate::VERSION),
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_elevator(mut self, elevator: Option<Arc<dyn Elevator>>) -> Self {
        self.elevator = elevator;
        self
    }

    /// Pretend to run on a different OS and architecture
    pub fn with_host(mut self, os: impl Into<String>, arch: impl Into<String>) -> Self {
        self.host_os = os.into();
        self.host_arch = arch.into();
        self
    }

    /// Replace this executable instead of the running one
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Run the pipeline once
    pub async fn run(&mut self, options: &UpdateOptions) -> Result<UpdateResult> {
        let mut temp_path = None;
        let result = self.execute(options, &mut temp_path).await;

        if let Some(path) = &temp_path {
            remove_temp_file(path);
        }
        if let Err(e) = &result {
            self.reporter.error(&format!("Update failed: {}", e));
        }

        result
    }

    async fn execute(
        &mut self,
        options: &UpdateOptions,
        temp_path: &mut Option<PathBuf>,
    ) -> Result<UpdateResult> {
        let platform = PlatformInfo::from_raw(&self.host_os, &self.host_arch)?;

        let target = match &self.executable {
            Some(exe) => InstallTarget::from_path(exe, &self.temp_dir)?,
            None => InstallTarget::current_exe(&self.temp_dir)?,
        };
        *temp_path = Some(target.temp_download_path.clone());

        let vars = TemplateVars::new(
            &self.config.repository_url,
            &self.config.app_name,
            &platform,
        );
        validate_url(&vars.url)?;

        let credentials = self.credentials(options, &vars.url).await?;
        let client = self.client.clone().with_credentials(credentials);

        let version = ReleaseLocator::new(&client, &self.config.pinned_release, &vars)
            .resolve(&options.selector)
            .await?;

        if version == self.current_version {
            self.reporter.success(&format!(
                "{} is already up to date ({})",
                self.config.app_name, version
            ));
            return Ok(UpdateResult::AlreadyUpToDate { version });
        }

        self.reporter.info(&format!(
            "Updating {} from {} to {}",
            self.config.app_name, self.current_version, version
        ));

        BinaryDownloader::new(&client, &self.config.bin_mask, &vars)
            .with_progress(options.show_progress)
            .download(&version, &target.temp_download_path)
            .await?;

        let mode = Installer::new(&target, self.elevator.as_deref()).install()?;

        self.reporter.success(&format!(
            "Updated {} to {}",
            target.final_path.display(),
            version
        ));

        Ok(UpdateResult::Updated {
            from: self.current_version.clone(),
            to: version,
            path: target.final_path,
            mode,
        })
    }

    /// Command-line credentials win; otherwise the store is consulted only
    /// when the repository asks for auth
    async fn credentials(
        &mut self,
        options: &UpdateOptions,
        url: &str,
    ) -> Result<Option<Credentials>> {
        if let Some(creds) = options.credentials.as_ref().filter(|c| c.is_complete()) {
            debug!("Using credentials from the command line");
            return Ok(Some(creds.clone()));
        }

        if !check_auth_required(&self.client, url).await {
            return Ok(None);
        }

        info!("{} requires authentication", url);
        let creds = CredentialResolver::new(self.store.as_mut(), self.prompter.as_ref())
            .resolve(url)?;
        Ok(Some(creds))
    }
}

fn remove_temp_file(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}
