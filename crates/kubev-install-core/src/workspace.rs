//! Scratch directory for downloads and extraction
//!
//! The directory is removed when the [`ScratchWorkspace`] is dropped, which
//! covers success, early error returns, and a cancelled pipeline future.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{InstallError, Result};
use crate::installer::Stage;

const PREFIX: &str = "kubev-install-";

#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
}

impl ScratchWorkspace {
    /// Create a workspace under `root`, or the system temp dir
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);

        let root = root
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let dir = builder
            .tempdir_in(&root)
            .map_err(fs_error("create workspace in", &root))?;

        debug!(path = %dir.path().display(), "created workspace");
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Path of a file inside the workspace
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path().join(name)
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!(path = %path.display(), "removed workspace"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove workspace"),
            }
        }
    }
}

/// Map an I/O failure on `path` to a DOWNLOAD-stage error
fn fs_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> InstallError + 'a {
    move |e| InstallError::filesystem(Stage::Download, action, path, e)
}
