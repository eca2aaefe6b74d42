//! Release installer for the kubev CLI
//!
//! Provides:
//! - Required tool detection on `PATH`
//! - Host platform detection (`{os}-{arch}` tags)
//! - Version resolution against GitHub releases (pinned or latest)
//! - Artifact and checksum manifest download with bounded retries
//! - SHA256 verification against the release manifest
//! - Archive extraction and binary installation
//!
//! The stages are strictly sequential and are driven by [`Installer`].

pub mod artifact;
pub mod checksum;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod install;
pub mod installer;
pub mod platform;
pub mod preflight;
pub mod releases;
pub mod retry;
pub mod workspace;

pub use artifact::ArtifactSet;
pub use config::{InstallerConfig, ReleaseSource};
pub use error::{InstallError, Result};
pub use installer::{InstallOutcome, InstallPlan, Installer, Stage};
pub use platform::{Arch, HostIdentity, Os, PlatformTag};
pub use releases::{ReleaseClient, ResolvedVersion, VersionSource};
pub use workspace::ScratchWorkspace;

/// Installer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the binary shipped in release archives
pub const BINARY_NAME: &str = "kubev";

/// GitHub repository owner
pub const REPO_OWNER: &str = "kubev";

/// GitHub repository name
pub const REPO_NAME: &str = "kubev";

/// Environment variable that pins the release tag
pub const VERSION_ENV: &str = "KUBEV_VERSION";

/// Environment variable that selects the install directory
pub const INSTALL_DIR_ENV: &str = "INSTALL_DIR";
