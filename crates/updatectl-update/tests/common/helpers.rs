//! Helpers for pipeline tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use updatectl_core::{PlatformInfo, TemplateVars, UpdateConfig};
use updatectl_secrets::{MemoryKeyring, Prompter, SecretStoreError, SecureString};
use updatectl_update::{Elevator, Reporter, UpdateError, UpdateOptions, Updater};

use super::constants::*;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Captures everything the pipeline reports
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, msg)| msg)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Answers every prompt with fixed values and counts prompts
pub struct ScriptedPrompter {
    username: String,
    password: String,
    pub prompts: AtomicUsize,
}

impl ScriptedPrompter {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Prompter for ScriptedPrompter {
    fn username(&self, _url: &str) -> Result<String, SecretStoreError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.username.clone())
    }

    fn password(&self, _url: &str) -> Result<SecureString, SecretStoreError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(SecureString::from(self.password.as_str()))
    }

    fn passphrase(&self, _confirm: bool) -> Result<SecureString, SecretStoreError> {
        Ok(SecureString::from("test-passphrase"))
    }
}

/// Applies modes in-process and records every call
#[derive(Default)]
pub struct LocalElevator {
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl LocalElevator {
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Elevator for LocalElevator {
    fn chmod(&self, mode: &str, path: &Path) -> Result<(), UpdateError> {
        self.calls
            .lock()
            .unwrap()
            .push((mode.to_string(), path.to_path_buf()));
        let bits = u32::from_str_radix(mode, 8).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(bits)).unwrap();
        Ok(())
    }

    fn name(&self) -> String {
        "local".into()
    }
}

/// Install directory holding a fake current executable, plus a temp dir
pub struct Sandbox {
    pub install_dir: TempDir,
    pub temp_dir: TempDir,
    pub executable: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let install_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let executable = install_dir.path().join(APP);
        fs::write(&executable, OLD_BINARY).unwrap();
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o700)).unwrap();
        Self {
            install_dir,
            temp_dir,
            executable,
        }
    }

    pub fn installed(&self) -> Vec<u8> {
        fs::read(&self.executable).unwrap()
    }

    pub fn installed_mode(&self) -> u32 {
        fs::metadata(&self.executable).unwrap().permissions().mode() & 0o777
    }

    pub fn set_install_dir_mode(&self, mode: u32) {
        fs::set_permissions(self.install_dir.path(), fs::Permissions::from_mode(mode)).unwrap();
    }

    pub fn install_dir_mode(&self) -> u32 {
        fs::metadata(self.install_dir.path())
            .unwrap()
            .permissions()
            .mode()
            & 0o7777
    }

    /// Files left in the temp dir
    pub fn temp_files(&self) -> Vec<PathBuf> {
        fs::read_dir(self.temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

pub fn test_config(repository_url: &str) -> UpdateConfig {
    UpdateConfig {
        repository_url: repository_url.to_string(),
        ..Default::default()
    }
    .with_defaults(APP)
}

pub fn test_vars(repository_url: &str) -> TemplateVars {
    let platform = PlatformInfo::from_raw(HOST_OS, HOST_ARCH).unwrap();
    TemplateVars::new(repository_url, APP, &platform)
}

/// Updater wired to the sandbox, an in-memory store and no elevation
pub fn test_updater(
    repository_url: &str,
    sandbox: &Sandbox,
    prompter: Arc<ScriptedPrompter>,
    reporter: Arc<RecordingReporter>,
) -> Updater {
    Updater::new(
        test_config(repository_url),
        Box::new(MemoryKeyring::new()),
        prompter,
    )
    .unwrap()
    .with_reporter(reporter)
    .with_elevator(None)
    .with_host(HOST_OS, HOST_ARCH)
    .with_executable(&sandbox.executable)
    .with_temp_dir(sandbox.temp_dir.path())
    .with_current_version(CURRENT_VERSION)
}

pub fn quiet_options() -> UpdateOptions {
    UpdateOptions {
        show_progress: false,
        ..Default::default()
    }
}
