//! Release fixture builder
//!
//! Produces the two assets of a release (zip archive and checksum manifest)
//! in memory so they can be served by a mock server.

use std::io::{Cursor, Write};

use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;

use super::constants::*;

/// A fully built release: asset names and bodies
#[derive(Debug, Clone)]
pub struct ReleaseFixture {
    pub version: String,
    pub platform: String,
    pub archive_name: String,
    pub archive: Vec<u8>,
    pub manifest_name: String,
    pub manifest: String,
}

/// Fluent builder for [`ReleaseFixture`]
pub struct ReleaseFixtureBuilder {
    version: String,
    platform: String,
    binary_name: String,
    binary: Vec<u8>,
    include_binary: bool,
    extra_files: Vec<(String, Vec<u8>)>,
    digest_override: Option<String>,
    omit_manifest_entry: bool,
}

impl ReleaseFixtureBuilder {
    pub fn new() -> Self {
        Self {
            version: TAG_V1_2_3.to_string(),
            platform: PLATFORM_LINUX_AMD64.to_string(),
            binary_name: BINARY.to_string(),
            binary: FAKE_BINARY_CONTENT.to_vec(),
            include_binary: true,
            extra_files: Vec::new(),
            digest_override: None,
            omit_manifest_entry: false,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    pub fn binary(mut self, content: &[u8]) -> Self {
        self.binary = content.to_vec();
        self
    }

    /// Ship an archive that lacks the binary
    pub fn without_binary(mut self) -> Self {
        self.include_binary = false;
        self
    }

    pub fn extra_file(mut self, name: &str, content: &[u8]) -> Self {
        self.extra_files.push((name.to_string(), content.to_vec()));
        self
    }

    /// Publish a manifest whose digest does not match the archive
    pub fn tampered_manifest(mut self) -> Self {
        self.digest_override = Some(WRONG_CHECKSUM.to_string());
        self
    }

    /// Publish a manifest that lists other platforms only
    pub fn without_manifest_entry(mut self) -> Self {
        self.omit_manifest_entry = true;
        self
    }

    pub fn build(self) -> ReleaseFixture {
        let archive_name = format!("{}-{}-{}.zip", BINARY, self.version, self.platform);
        let manifest_name = format!("{}-{}-checksums.txt", BINARY, self.version);

        let mut files = Vec::new();
        if self.include_binary {
            files.push((self.binary_name.clone(), self.binary.clone()));
        }
        files.extend(self.extra_files.iter().cloned());
        let archive = zip_bytes(&files);

        let digest = self.digest_override.unwrap_or_else(|| sha256_hex(&archive));
        let other_platform = if self.platform == PLATFORM_DARWIN_ARM64 {
            PLATFORM_LINUX_AMD64
        } else {
            PLATFORM_DARWIN_ARM64
        };

        let mut manifest = format!(
            "{}  {}-{}-{}.zip\n",
            sha256_hex(b"another platform"),
            BINARY,
            self.version,
            other_platform
        );
        if !self.omit_manifest_entry {
            manifest.push_str(&format!("{}  {}\n", digest, archive_name));
        }

        ReleaseFixture {
            version: self.version,
            platform: self.platform,
            archive_name,
            archive,
            manifest_name,
            manifest,
        }
    }
}

impl Default for ReleaseFixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Zip `files` (name, content) into an in-memory archive
pub fn zip_bytes(files: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())
            .expect("start zip entry");
        zip.write_all(content).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
