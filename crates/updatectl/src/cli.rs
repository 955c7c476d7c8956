//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// updatectl - self-updating CLI
#[derive(Parser, Debug)]
#[command(name = "updatectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update to the pinned stable release or a specific version
    Update(UpdateArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Install this version instead of the pinned stable release
    #[arg(short, long)]
    pub target: Option<String>,

    /// Username for the release repository (skips the keyring)
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    /// Password for the release repository (skips the keyring)
    #[arg(short, long, requires = "username")]
    pub password: Option<String>,

    /// Release repository base URL
    #[arg(long, env = "UPDATECTL_REPOSITORY_URL")]
    pub repository_url: Option<String>,

    /// Template for the pinned stable release URL
    #[arg(long)]
    pub release_file_mask: Option<String>,

    /// Template for the binary download URL
    #[arg(long)]
    pub bin_mask: Option<String>,

    /// Read the whole configuration from this file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not read or write the encrypted keyring
    #[arg(long)]
    pub no_keyring: bool,

    /// Hide the download progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
