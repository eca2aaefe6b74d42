//! Release artifact naming

use crate::config::ReleaseSource;
use crate::platform::PlatformTag;

/// Names and URLs of the two files a release installation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// `{binary}-{version}-{platform}.zip`
    pub archive_name: String,

    /// `{binary}-{version}-checksums.txt`
    pub manifest_name: String,

    pub archive_url: String,

    pub manifest_url: String,
}

impl ArtifactSet {
    pub fn new(
        source: &ReleaseSource,
        binary: &str,
        version: &str,
        platform: &PlatformTag,
    ) -> Self {
        let archive_name = archive_name(binary, version, platform);
        let manifest_name = manifest_name(binary, version);

        Self {
            archive_url: source.asset_url(version, &archive_name),
            manifest_url: source.asset_url(version, &manifest_name),
            archive_name,
            manifest_name,
        }
    }
}

pub fn archive_name(binary: &str, version: &str, platform: &PlatformTag) -> String {
    format!("{}-{}-{}.zip", binary, version, platform)
}

pub fn manifest_name(binary: &str, version: &str) -> String {
    format!("{}-{}-checksums.txt", binary, version)
}
