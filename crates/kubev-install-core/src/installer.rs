//! The installation pipeline
//!
//! `CHECK_DEPS → DETECT_PLATFORM → RESOLVE_VERSION → DOWNLOAD → VERIFY →
//! EXTRACT → INSTALL → DONE`
//!
//! Stages run strictly in order and the first failure ends the run. Values
//! produced by one stage are passed to the next; nothing is shared through
//! globals. The scratch workspace exists only between DOWNLOAD and DONE and
//! is dropped on every exit path.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::artifact::ArtifactSet;
use crate::config::InstallerConfig;
use crate::download::Downloader;
use crate::error::{InstallError, Result};
use crate::platform::{HostIdentity, PlatformTag};
use crate::releases::{ReleaseClient, ResolvedVersion};
use crate::workspace::ScratchWorkspace;
use crate::{checksum, extract, install, preflight};

/// Subdirectory of the workspace that receives the unpacked archive
const EXTRACT_DIR: &str = "extract";

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    CheckDeps,
    DetectPlatform,
    ResolveVersion,
    Download,
    Verify,
    Extract,
    Install,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckDeps => "CHECK_DEPS",
            Self::DetectPlatform => "DETECT_PLATFORM",
            Self::ResolveVersion => "RESOLVE_VERSION",
            Self::Download => "DOWNLOAD",
            Self::Verify => "VERIFY",
            Self::Extract => "EXTRACT",
            Self::Install => "INSTALL",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything decided before the first byte is downloaded
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub version: ResolvedVersion,
    pub platform: PlatformTag,
    pub artifacts: ArtifactSet,
    /// Final path of the installed binary
    pub target: PathBuf,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub binary: String,
    pub version: ResolvedVersion,
    pub platform: PlatformTag,
    pub path: PathBuf,
}

/// Drives one installation run
pub struct Installer {
    config: InstallerConfig,
    client: reqwest::Client,
    host: Option<HostIdentity>,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(InstallError::HttpClient)?;

        Ok(Self {
            config,
            client,
            host: None,
        })
    }

    /// Use fixed raw identifiers instead of probing the host with `uname`
    pub fn with_host(mut self, host: HostIdentity) -> Self {
        self.host = Some(host);
        self
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Run every stage
    pub async fn run(&self) -> Result<InstallOutcome> {
        let plan = self.plan().await?;
        self.execute(plan).await
    }

    /// CHECK_DEPS, DETECT_PLATFORM and RESOLVE_VERSION; nothing is written
    pub async fn plan(&self) -> Result<InstallPlan> {
        enter(Stage::CheckDeps);
        preflight::check_dependencies(&self.config.required_tools)?;

        enter(Stage::DetectPlatform);
        let host = match &self.host {
            Some(host) => host.clone(),
            None => HostIdentity::detect().await?,
        };
        let platform = host.platform()?;
        info!(platform = %platform, "detected platform");

        enter(Stage::ResolveVersion);
        let version = ReleaseClient::new(self.client.clone(), self.config.source.clone())
            .with_token(self.config.github_token.clone())
            .resolve(self.config.pinned_version.as_deref())
            .await?;
        info!(version = %version, source = %version.source, "resolved version");

        let artifacts = ArtifactSet::new(
            &self.config.source,
            &self.config.binary_name,
            version.as_str(),
            &platform,
        );

        Ok(InstallPlan {
            version,
            platform,
            artifacts,
            target: self.config.target_path(),
        })
    }

    /// DOWNLOAD through DONE for an already resolved plan
    pub async fn execute(&self, plan: InstallPlan) -> Result<InstallOutcome> {
        enter(Stage::Download);
        let workspace = ScratchWorkspace::create(self.config.temp_root.as_deref())?;

        let downloader = Downloader::new(self.client.clone())
            .with_retry_policy(self.config.retry_policy.clone())
            .with_progress(self.config.show_progress);

        let manifest = workspace.join(&plan.artifacts.manifest_name);
        downloader
            .fetch(&plan.artifacts.manifest_url, &manifest)
            .await?;

        let archive = workspace.join(&plan.artifacts.archive_name);
        downloader
            .fetch(&plan.artifacts.archive_url, &archive)
            .await?;

        enter(Stage::Verify);
        checksum::verify_archive(&archive, &manifest)?;

        enter(Stage::Extract);
        let binary = extract::extract_binary(
            &archive,
            &workspace.join(EXTRACT_DIR),
            &self.config.binary_name,
        )?;

        enter(Stage::Install);
        let path = install::install_binary(
            &binary,
            &self.config.install_dir,
            &self.config.binary_name,
        )?;

        drop(workspace);
        enter(Stage::Done);

        info!(
            "Installed {} {} to {}",
            self.config.binary_name,
            plan.version,
            path.display()
        );

        Ok(InstallOutcome {
            binary: self.config.binary_name.clone(),
            version: plan.version,
            platform: plan.platform,
            path,
        })
    }
}

fn enter(stage: Stage) {
    debug!(stage = %stage, "entering stage");
}
