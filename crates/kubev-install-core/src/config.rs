//! Installer configuration
//!
//! There is no configuration file. Values come from the command line and the
//! environment (see the `kubev-install` binary) and fall back to the defaults
//! defined here.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::{BINARY_NAME, REPO_NAME, REPO_OWNER, VERSION};

/// Where releases are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    /// Repository owner
    pub repo_owner: String,

    /// Repository name
    pub repo_name: String,

    /// Base URL for the GitHub API
    pub api_url: String,

    /// Base URL that serves `{owner}/{repo}/releases/download/...`
    pub download_url: String,
}

impl ReleaseSource {
    /// `owner/name` slug
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Endpoint describing the most recent published release
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }

    /// Download URL for a named asset of a tagged release
    pub fn asset_url(&self, version: &str, asset: &str) -> String {
        format!(
            "{}/{}/{}/releases/download/{}/{}",
            self.download_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name,
            version,
            asset
        )
    }

    /// Point both API and downloads at one base URL (mirrors, tests)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_url = base.clone();
        self.download_url = base;
        self
    }

    /// Parse an `owner/name` slug
    pub fn with_repo_slug(mut self, slug: &str) -> Option<Self> {
        let (owner, name) = slug.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        self.repo_owner = owner.to_string();
        self.repo_name = name.to_string();
        Some(self)
    }
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            repo_owner: REPO_OWNER.to_string(),
            repo_name: REPO_NAME.to_string(),
            api_url: "https://api.github.com".to_string(),
            download_url: "https://github.com".to_string(),
        }
    }
}

/// Everything a single installation run needs to know up front
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Release host and repository
    pub source: ReleaseSource,

    /// Binary to pull out of the archive and install
    pub binary_name: String,

    /// Release tag to install; `None` resolves the latest release
    pub pinned_version: Option<String>,

    /// Directory that receives the binary
    pub install_dir: PathBuf,

    /// Tools that must be on `PATH` before anything else happens
    pub required_tools: Vec<String>,

    /// Retry policy applied to each downloaded file
    pub retry_policy: RetryPolicy,

    /// Bearer token for the releases API
    pub github_token: Option<String>,

    /// User agent sent with every request
    pub user_agent: String,

    /// TCP connect timeout for each request
    pub connect_timeout: Duration,

    /// Parent directory for the scratch workspace; system temp dir when `None`
    pub temp_root: Option<PathBuf>,

    /// Render download progress bars
    pub show_progress: bool,
}

impl InstallerConfig {
    /// Defaults, installing into `install_dir`
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ReleaseSource::default(),
            binary_name: BINARY_NAME.to_string(),
            pinned_version: None,
            install_dir: install_dir.into(),
            required_tools: default_required_tools(),
            retry_policy: RetryPolicy::download(),
            github_token: None,
            user_agent: format!("kubev-install/{}", VERSION),
            connect_timeout: Duration::from_secs(30),
            temp_root: None,
            show_progress: true,
        }
    }

    /// Pin a release tag. Blank values leave the version unpinned.
    pub fn with_pinned_version(mut self, version: Option<String>) -> Self {
        self.pinned_version = version.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_source(mut self, source: ReleaseSource) -> Self {
        self.source = source;
        self
    }

    /// Add tools on top of the defaults
    pub fn with_extra_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tool in tools {
            let tool = tool.into();
            if !self.required_tools.contains(&tool) {
                self.required_tools.push(tool);
            }
        }
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Final location of the installed binary
    pub fn target_path(&self) -> PathBuf {
        self.install_dir.join(&self.binary_name)
    }
}

/// External tools checked before anything else runs
///
/// Only `uname` is needed: it supplies the raw platform identifiers. Fetching,
/// SHA256 hashing and unzipping happen in-process (reqwest, sha2, zip), so no
/// download, checksum or archive tool has to be on `PATH`. Callers add more
/// with [`InstallerConfig::with_extra_tools`].
fn default_required_tools() -> Vec<String> {
    vec!["uname".to_string()]
}
