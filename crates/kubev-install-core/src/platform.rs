//! Platform detection
//!
//! Maps the host's raw operating system and CPU architecture identifiers
//! (as printed by `uname -s` / `uname -m`) onto the normalized `{os}-{arch}`
//! tag used in release artifact names. Unknown identifiers are rejected;
//! there is no fallback platform.

use std::fmt;

use tokio::process::Command;
use tracing::debug;

use crate::error::{InstallError, Result};

/// Normalized operating system tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
}

impl Os {
    /// Map a raw identifier (`Linux`, `Darwin`, `macos`, ...)
    pub fn from_raw(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" => Ok(Self::Darwin),
            _ => Err(InstallError::UnsupportedOs {
                raw: raw.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized CPU architecture tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    /// Map a raw identifier (`x86_64`, `aarch64`, `arm64`, ...)
    pub fn from_raw(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::Amd64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            _ => Err(InstallError::UnsupportedArch {
                raw: raw.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{os}-{arch}` identifier selecting the release artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformTag {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Normalize raw identifiers; the OS is checked first
    pub fn from_raw(os: &str, arch: &str) -> Result<Self> {
        Ok(Self {
            os: Os::from_raw(os)?,
            arch: Arch::from_raw(arch)?,
        })
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Raw identifiers as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub os: String,
    pub arch: String,
}

impl HostIdentity {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Read the kernel name and machine hardware name with `uname`
    pub async fn detect() -> Result<Self> {
        let os = uname("-s").await?;
        let arch = uname("-m").await?;
        debug!(os = %os, arch = %arch, "detected host identity");
        Ok(Self { os, arch })
    }

    pub fn platform(&self) -> Result<PlatformTag> {
        PlatformTag::from_raw(&self.os, &self.arch)
    }
}

async fn uname(flag: &str) -> Result<String> {
    let command = format!("uname {}", flag);
    let output = Command::new("uname")
        .arg(flag)
        .output()
        .await
        .map_err(|e| InstallError::PlatformDetection {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(InstallError::PlatformDetection {
            command,
            reason: format!(
                "exit code {}",
                output.status.code().unwrap_or(-1)
            ),
        });
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
        return Err(InstallError::PlatformDetection {
            command,
            reason: "empty output".to_string(),
        });
    }
    Ok(value)
}
