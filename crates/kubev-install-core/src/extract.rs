//! Zip extraction inside the workspace

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{InstallError, Result};
use crate::installer::Stage;

/// Unpack `archive` into `dest`
///
/// Entries whose names would escape `dest` (absolute paths, `..`) are skipped.
pub fn unzip_into(archive: &Path, dest: &Path) -> Result<()> {
    let archive_label = archive.display().to_string();
    let zip_err = |source| InstallError::Archive {
        archive: archive_label.clone(),
        source,
    };

    let file = fs::File::open(archive).map_err(fs_error("open", archive))?;
    let mut zip = ZipArchive::new(file).map_err(zip_err)?;
    fs::create_dir_all(dest).map_err(fs_error("create", dest))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(zip_err)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(fs_error("create", &outpath))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(fs_error("create", parent))?;
        }
        let mut out = fs::File::create(&outpath).map_err(fs_error("create", &outpath))?;
        io::copy(&mut entry, &mut out).map_err(fs_error("extract", &outpath))?;
        debug!(path = %outpath.display(), "extracted");
    }

    Ok(())
}

/// Unpack `archive` into `dest` and return the path of `binary` at its root
pub fn extract_binary(archive: &Path, dest: &Path, binary: &str) -> Result<PathBuf> {
    unzip_into(archive, dest)?;

    let candidate = dest.join(binary);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "found binary");
        return Ok(candidate);
    }

    Err(InstallError::BinaryNotFound {
        binary: binary.to_string(),
        archive: archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| archive.display().to_string()),
    })
}

/// Map an I/O failure on `path` to a EXTRACT-stage error
fn fs_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> InstallError + 'a {
    move |e| InstallError::filesystem(Stage::Extract, action, path, e)
}
