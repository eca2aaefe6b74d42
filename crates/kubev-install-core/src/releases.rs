//! Release version resolution against the GitHub releases API

use std::fmt;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ReleaseSource;
use crate::error::{InstallError, Result};

/// The one field of the GitHub release payload the installer reads
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRelease {
    /// Release tag (e.g., "v1.4.0")
    pub tag_name: Option<String>,
}

/// Where a resolved version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Supplied by the caller, used verbatim
    Pinned,
    /// Read from the latest-release endpoint
    Latest,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pinned => write!(f, "pinned"),
            Self::Latest => write!(f, "latest"),
        }
    }
}

/// A release tag, fixed for the rest of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub tag: String,
    pub source: VersionSource,
}

impl ResolvedVersion {
    pub fn pinned(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            source: VersionSource::Pinned,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Client for the releases API
pub struct ReleaseClient {
    client: reqwest::Client,
    source: ReleaseSource,
    token: Option<String>,
}

impl ReleaseClient {
    pub fn new(client: reqwest::Client, source: ReleaseSource) -> Self {
        Self {
            client,
            source,
            token: None,
        }
    }

    /// Authenticate API requests with a bearer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Use `pinned` verbatim, otherwise ask the API for the latest tag
    pub async fn resolve(&self, pinned: Option<&str>) -> Result<ResolvedVersion> {
        if let Some(tag) = pinned {
            debug!(version = tag, "using pinned version");
            return Ok(ResolvedVersion::pinned(tag));
        }

        let tag = self.latest_tag().await?;
        info!(version = %tag, "resolved latest release");
        Ok(ResolvedVersion {
            tag,
            source: VersionSource::Latest,
        })
    }

    /// Tag of the most recent published release
    pub async fn latest_tag(&self) -> Result<String> {
        let release = self.get_latest().await?;
        match release.tag_name {
            Some(tag) if !tag.trim().is_empty() => Ok(tag.trim().to_string()),
            Some(_) => Err(InstallError::version_resolution(
                "latest release has an empty tag_name",
            )),
            None => Err(InstallError::version_resolution(
                "latest release response has no tag_name",
            )),
        }
    }

    /// Fetch the latest release payload
    pub async fn get_latest(&self) -> Result<LatestRelease> {
        let url = self.source.latest_release_url();
        debug!("Fetching latest release from: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            InstallError::version_resolution(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::version_resolution(format!(
                "{} returned {}",
                url, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            InstallError::version_resolution(format!("failed to read response from {}: {}", url, e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            InstallError::version_resolution(format!("malformed response from {}: {}", url, e))
        })
    }
}
