//! Shared constants for test infrastructure

use kubev_install_core::HostIdentity;

// Tags
pub const TAG_V1_2_3: &str = "v1.2.3";
pub const TAG_V0_9_0: &str = "v0.9.0";

pub const BINARY: &str = "kubev";

// Platform tags
pub const PLATFORM_LINUX_AMD64: &str = "linux-amd64";
pub const PLATFORM_DARWIN_ARM64: &str = "darwin-arm64";

// Binary content for testing
pub const FAKE_BINARY_CONTENT: &[u8] = b"#!/bin/sh\necho kubev\n";
pub const SUCCESS_CONTENT: &[u8] = b"success";

pub const WRONG_CHECKSUM: &str = "0000000000000000000000000000000000000000000000000000000000000000";

pub const TEST_TOKEN: &str = "ghp_test_token";

/// Raw identifiers of the host every pipeline test pretends to be
pub fn linux_amd64_host() -> HostIdentity {
    HostIdentity::new("Linux", "x86_64")
}
