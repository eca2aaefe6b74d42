//! Error types for kubev-install-core

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::installer::Stage;
use crate::VERSION_ENV;

/// Result type alias using the installer's error type
pub type Result<T> = std::result::Result<T, InstallError>;

/// Every way an installation run can fail
///
/// All variants are fatal for the run. Only downloads are retried, and only
/// inside the download stage.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A required external tool is not on `PATH`
    #[error("required tool '{tool}' was not found on PATH")]
    MissingDependency { tool: String },

    /// Operating system identifier outside the mapping table
    #[error("unsupported operating system: {raw}")]
    UnsupportedOs { raw: String },

    /// CPU architecture identifier outside the mapping table
    #[error("unsupported architecture: {raw}")]
    UnsupportedArch { raw: String },

    /// The host identifiers could not be read
    #[error("failed to detect host platform with `{command}`: {reason}")]
    PlatformDetection { command: String, reason: String },

    /// The latest release tag could not be determined
    #[error("could not resolve the latest release ({reason}); set {env} to pin a version explicitly", env = VERSION_ENV)]
    VersionResolution { reason: String },

    /// A release asset could not be fetched
    #[error("failed to download {url} after {attempts} attempt(s): {reason}")]
    Download {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// The archive does not match its manifest entry
    #[error("checksum verification failed for {archive}: {reason}; the download may be corrupted or tampered with")]
    Integrity { archive: String, reason: String },

    /// The archive unpacked but did not contain the binary
    #[error("expected binary '{binary}' not found in archive {archive}")]
    BinaryNotFound { binary: String, archive: String },

    /// The archive could not be read as a zip file
    #[error("invalid archive {archive}: {source}")]
    Archive {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// A filesystem operation failed
    #[error("failed to {action} {}: {source}", .path.display())]
    Filesystem {
        stage: Stage,
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl InstallError {
    /// Create a missing dependency error
    pub fn missing_dependency(tool: impl Into<String>) -> Self {
        Self::MissingDependency { tool: tool.into() }
    }

    /// Create a version resolution error
    pub fn version_resolution(reason: impl Into<String>) -> Self {
        Self::VersionResolution {
            reason: reason.into(),
        }
    }

    /// Create an integrity error
    pub fn integrity(archive: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Integrity {
            archive: archive.into(),
            reason: reason.into(),
        }
    }

    /// Create a filesystem error for `path`, raised during `stage`
    pub fn filesystem(stage: Stage, action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Filesystem {
            stage,
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// The pipeline stage this error terminates
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingDependency { .. } => Stage::CheckDeps,
            Self::UnsupportedOs { .. }
            | Self::UnsupportedArch { .. }
            | Self::PlatformDetection { .. } => Stage::DetectPlatform,
            Self::VersionResolution { .. } | Self::HttpClient(_) => Stage::ResolveVersion,
            Self::Download { .. } => Stage::Download,
            Self::Integrity { .. } => Stage::Verify,
            Self::BinaryNotFound { .. } | Self::Archive { .. } => Stage::Extract,
            Self::Filesystem { stage, .. } => *stage,
        }
    }
}
