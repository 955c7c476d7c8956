//! Update command

use anyhow::{Context, Result};
use std::sync::Arc;
use updatectl_core::{ConfigLoader, ConfigOverrides};
use updatectl_secrets::{
    Credentials, FileKeyring, MemoryKeyring, Prompter, SecretStore, TerminalPrompter,
};
use updatectl_update::{UpdateOptions, UpdateResult, Updater, VersionSelector};

use crate::cli::UpdateArgs;
use crate::output::{self, TerminalReporter};

pub async fn run(args: UpdateArgs, quiet: bool) -> Result<()> {
    let (mut updater, options) = match prepare(args, quiet) {
        Ok(prepared) => prepared,
        Err(e) => {
            output::error(&format!("{:#}", e));
            return Err(e);
        }
    };

    // The pipeline reports its own failure
    match updater.run(&options).await? {
        UpdateResult::AlreadyUpToDate { version } => {
            tracing::debug!("Nothing to do, running {}", version)
        }
        UpdateResult::Updated { from, to, path, mode } => tracing::info!(
            "Replaced {} ({} -> {}, {:?} install)",
            path.display(),
            from,
            to,
            mode
        ),
    }
    Ok(())
}

fn prepare(args: UpdateArgs, quiet: bool) -> Result<(Updater, UpdateOptions)> {
    let overrides = ConfigOverrides {
        repository_url: args.repository_url,
        pinned_release: args.release_file_mask,
        bin_mask: args.bin_mask,
    };
    let config = ConfigLoader::new()
        .load(args.config.as_deref(), &overrides, app_name())
        .context("Failed to load update configuration")?;

    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);
    let store = secret_store(args.no_keyring, prompter.clone());

    let credentials = match (args.username, args.password) {
        (Some(username), Some(password)) => Some(Credentials::new(
            config.repository_url.trim_end_matches('/'),
            username,
            password,
        )),
        _ => None,
    };

    let options = UpdateOptions {
        selector: VersionSelector::from_target(args.target.as_deref()),
        credentials,
        show_progress: !args.no_progress && !quiet,
    };

    let updater = Updater::new(config, store, prompter)?
        .with_reporter(Arc::new(TerminalReporter::new(quiet)));
    Ok((updater, options))
}

fn secret_store(no_keyring: bool, prompter: Arc<dyn Prompter>) -> Box<dyn SecretStore> {
    if no_keyring {
        return Box::new(MemoryKeyring::new());
    }
    match FileKeyring::default_path() {
        Some(path) => Box::new(FileKeyring::open(path, prompter)),
        None => {
            output::warning("No config directory found, credentials will not be saved");
            Box::new(MemoryKeyring::new())
        }
    }
}

/// `app` template variable when `app_name` is not configured
fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}
