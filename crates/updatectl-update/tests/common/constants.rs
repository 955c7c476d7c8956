//! Test constants

pub const APP: &str = "updatectl";

pub const CURRENT_VERSION: &str = "v2.2.0";
pub const NEXT_VERSION: &str = "v2.3.0";

/// Raw host identifiers and what they map to in URLs
pub const HOST_OS: &str = "linux";
pub const HOST_ARCH: &str = "amd64";
pub const MAPPED_ARCH: &str = "x86_64";

/// Repository base path on the mock server
pub const REPO_PATH: &str = "/repo";
pub const RELEASE_PATH: &str = "/repo/stable_release";

pub const OLD_BINARY: &[u8] = b"#!/bin/sh\necho v2.2.0\n";
pub const NEW_BINARY: &[u8] = b"#!/bin/sh\necho v2.3.0\n";

pub const USERNAME: &str = "deploy";
pub const PASSWORD: &str = "s3cret";

/// Path of the binary for `version` on the test host
pub fn binary_path(version: &str) -> String {
    format!("{}/{}/{}_{}_{}", REPO_PATH, version, APP, HOST_OS, MAPPED_ARCH)
}
