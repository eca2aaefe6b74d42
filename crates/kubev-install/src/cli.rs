//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::Parser;
use kubev_install_core::{INSTALL_DIR_ENV, VERSION_ENV};

/// Install the kubev binary from its GitHub releases
///
/// Resolves a release, downloads the archive for this platform, verifies it
/// against the published SHA256 manifest and installs the binary.
#[derive(Parser, Debug)]
#[command(name = "kubev-install")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Release tag to install (default: latest release)
    #[arg(long = "version-tag", value_name = "TAG", env = VERSION_ENV)]
    pub version_tag: Option<String>,

    /// Directory to install into (default: current directory)
    #[arg(long, value_name = "DIR", env = INSTALL_DIR_ENV)]
    pub install_dir: Option<PathBuf>,

    /// Repository publishing the releases
    #[arg(long, value_name = "OWNER/NAME", default_value = "kubev/kubev")]
    pub repo: String,

    /// Base URL of the releases API
    #[arg(long, value_name = "URL", env = "KUBEV_INSTALL_API_URL")]
    pub api_url: Option<String>,

    /// Base URL serving release downloads
    #[arg(long, value_name = "URL", env = "KUBEV_INSTALL_DOWNLOAD_URL")]
    pub download_url: Option<String>,

    /// Additional tool that must be on PATH (repeatable)
    #[arg(long = "require", value_name = "TOOL")]
    pub require: Vec<String>,

    /// Token for the releases API
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Resolve version and platform, print the plan, download nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Disable download progress bars
    #[arg(long)]
    pub no_progress: bool,
}
