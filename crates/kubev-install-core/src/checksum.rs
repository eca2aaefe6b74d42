//! SHA256 verification against the release checksum manifest
//!
//! The manifest uses `sha256sum` output format, one entry per line:
//!
//! ```text
//! 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08  kubev-v1.2.3-linux-amd64.zip
//! ```
//!
//! A leading `*` on the filename (binary mode) is accepted.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::installer::Stage;

/// Read buffer for hashing (1MB)
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Length of a hex-encoded SHA256 digest
const SHA256_HEX_LEN: usize = 64;

/// One `<digest>  <filename>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub digest: String,
    pub file_name: String,
}

/// Parse every well-formed line; blank lines and `#` comments are skipped
pub fn parse_manifest(contents: &str) -> Vec<ManifestEntry> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (digest, rest) = line.split_once(char::is_whitespace)?;
            let file_name = rest.trim_start().trim_start_matches('*');
            if file_name.is_empty() {
                return None;
            }
            Some(ManifestEntry {
                digest: digest.to_string(),
                file_name: file_name.to_string(),
            })
        })
        .collect()
}

/// Expected digest for `file_name`, if the manifest lists it
pub fn expected_digest(contents: &str, file_name: &str) -> Option<String> {
    parse_manifest(contents)
        .into_iter()
        .find(|entry| entry.file_name == file_name)
        .map(|entry| entry.digest)
}

/// Hex-encoded SHA256 of a file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(fs_error("open for hashing", path))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(fs_error("read for hashing", path))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check `archive` against its entry in the manifest at `manifest`
///
/// Must succeed before the archive is unpacked.
pub fn verify_archive(archive: &Path, manifest: &Path) -> Result<()> {
    let archive_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let raw = std::fs::read(manifest).map_err(fs_error("read checksum manifest", manifest))?;
    let contents = String::from_utf8(raw).map_err(|_| {
        InstallError::integrity(&archive_name, "checksum manifest is not valid UTF-8")
    })?;

    let expected = expected_digest(&contents, &archive_name).ok_or_else(|| {
        InstallError::integrity(
            &archive_name,
            "no entry for this archive in the checksum manifest",
        )
    })?;

    if expected.len() != SHA256_HEX_LEN || !expected.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InstallError::integrity(
            &archive_name,
            format!("manifest entry '{}' is not a SHA256 digest", expected),
        ));
    }

    debug!("Calculating SHA256 checksum of {}", archive_name);
    let actual = sha256_file(archive)?;

    if !actual.eq_ignore_ascii_case(&expected) {
        return Err(InstallError::integrity(
            &archive_name,
            format!("expected {}, got {}", expected.to_ascii_lowercase(), actual),
        ));
    }

    info!(archive = %archive_name, sha256 = %actual, "checksum verified");
    Ok(())
}

/// Map an I/O failure on `path` to a VERIFY-stage error
fn fs_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> InstallError + 'a {
    move |e| InstallError::filesystem(Stage::Verify, action, path, e)
}
