//! Moving the verified binary into the install directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{InstallError, Result};
use crate::installer::Stage;

/// Mark `path` executable (0755)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).map_err(fs_error("stat", path))?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(fs_error("chmod", path))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Make `binary` executable and move it to `install_dir/name`
///
/// An existing file at the destination is replaced. There is no backup: an
/// interrupted cross-device copy can leave a partial file behind.
pub fn install_binary(binary: &Path, install_dir: &Path, name: &str) -> Result<PathBuf> {
    make_executable(binary)?;

    fs::create_dir_all(install_dir).map_err(fs_error("create install directory", install_dir))?;

    let target = install_dir.join(name);
    debug!("Installing binary: {:?} -> {:?}", binary, target);

    if let Err(rename_err) = fs::rename(binary, &target) {
        // Workspace and install dir can live on different filesystems.
        debug!(error = %rename_err, "rename failed, falling back to copy");
        fs::copy(binary, &target).map_err(fs_error("copy binary to", &target))?;
        fs::remove_file(binary).map_err(fs_error("remove", binary))?;
        make_executable(&target)?;
    }

    Ok(target)
}

/// Map an I/O failure on `path` to a INSTALL-stage error
fn fs_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> InstallError + 'a {
    move |e| InstallError::filesystem(Stage::Install, action, path, e)
}
