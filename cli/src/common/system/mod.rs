//! # PackRS System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host identity. The archive backend is the only part of PackRS that depends
//! on which operating system it runs on, and it asks through `HostPlatform`
//! rather than checking `cfg!` or `std::env::consts::OS` at the call site, so
//! tests can pick the host explicitly.
//!
//! ```rust
//! use crate::common::system::HostPlatform;
//!
//! let host = HostPlatform::detect();
//! if host.prefers_external_zip() {
//!     // shell out to `zip -r`
//! }
//! ```
//!
use std::fmt;

/// Operating system family of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl HostPlatform {
    /// Identifies the host this binary was compiled for.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => HostPlatform::MacOs,
            "linux" => HostPlatform::Linux,
            "windows" => HostPlatform::Windows,
            _ => HostPlatform::Other,
        }
    }

    /// Whether archives should be built by the native `zip` tool on this host.
    pub fn prefers_external_zip(self) -> bool {
        matches!(self, HostPlatform::MacOs)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostPlatform::MacOs => "macOS",
            HostPlatform::Linux => "Linux",
            HostPlatform::Windows => "Windows",
            HostPlatform::Other => "other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os() {
        assert_eq!(HostPlatform::from_os("macos"), HostPlatform::MacOs);
        assert_eq!(HostPlatform::from_os("linux"), HostPlatform::Linux);
        assert_eq!(HostPlatform::from_os("windows"), HostPlatform::Windows);
        assert_eq!(HostPlatform::from_os("freebsd"), HostPlatform::Other);
    }

    #[test]
    fn test_only_macos_prefers_external_zip() {
        assert!(HostPlatform::MacOs.prefers_external_zip());
        assert!(!HostPlatform::Linux.prefers_external_zip());
        assert!(!HostPlatform::Windows.prefers_external_zip());
        assert!(!HostPlatform::Other.prefers_external_zip());
    }

    #[test]
    fn test_detect_matches_compile_target() {
        let host = HostPlatform::detect();
        assert_eq!(host == HostPlatform::MacOs, cfg!(target_os = "macos"));
    }
}
