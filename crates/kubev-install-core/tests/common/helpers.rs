//! Installer setup against a mock server

use std::fs;
use std::path::Path;

use kubev_install_core::retry::RetryPolicy;
use kubev_install_core::{Installer, InstallerConfig, ReleaseSource};
use tempfile::TempDir;

use super::constants::*;

/// Install and scratch directories owned by a single test
pub struct TestDirs {
    pub root: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create test root");
        fs::create_dir_all(root.path().join("scratch")).expect("create scratch root");
        Self { root }
    }

    pub fn install_dir(&self) -> std::path::PathBuf {
        self.root.path().join("bin")
    }

    pub fn scratch_root(&self) -> std::path::PathBuf {
        self.root.path().join("scratch")
    }

    /// Entries currently under `dir`, or 0 if it does not exist
    pub fn entry_count(dir: &Path) -> usize {
        fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
    }

    pub fn scratch_is_empty(&self) -> bool {
        Self::entry_count(&self.scratch_root()) == 0
    }

    pub fn install_dir_is_empty(&self) -> bool {
        Self::entry_count(&self.install_dir()) == 0
    }
}

impl Default for TestDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration pointed at `server_uri` with fast retries and no progress bars
pub fn test_config(server_uri: &str, dirs: &TestDirs) -> InstallerConfig {
    let mut config = InstallerConfig::new(dirs.install_dir())
        .with_source(ReleaseSource::default().with_base_url(server_uri))
        .with_retry_policy(RetryPolicy::immediate(3))
        .with_temp_root(dirs.scratch_root())
        .with_progress(false);
    config.required_tools.clear();
    config
}

/// Installer for `config` on a fixed linux-amd64 host
pub fn test_installer(config: InstallerConfig) -> Installer {
    Installer::new(config)
        .expect("create installer")
        .with_host(linux_amd64_host())
}
