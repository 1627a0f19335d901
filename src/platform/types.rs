// Platform type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Operating system identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    Linux,
    MacOS,
    Windows,
    Android,
    FreeBSD,
    OpenBSD,
    Unknown,
}

impl OperatingSystem {
    /// Identifier used in error messages, matching `std::env::consts::OS`
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Linux => "linux",
            OperatingSystem::MacOS => "macos",
            OperatingSystem::Windows => "windows",
            OperatingSystem::Android => "android",
            OperatingSystem::FreeBSD => "freebsd",
            OperatingSystem::OpenBSD => "openbsd",
            OperatingSystem::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X86_64,
    ARM64,
    ARM32,
    Unknown,
}

impl Architecture {
    /// Identifier used in error messages, matching `std::env::consts::ARCH`
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::ARM64 => "aarch64",
            Architecture::ARM32 => "arm",
            Architecture::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the command builder needs to know about the host.
///
/// Probe results that cost IO (`wsl_mount_point`, `local_opener`) are only
/// filled in when the launch path needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub os: OperatingSystem,
    pub arch: Architecture,
    pub is_wsl: bool,
    pub is_container: bool,
    /// Mount point of the host drives under WSL, always ending in `/`
    pub wsl_mount_point: Option<String>,
    /// `SYSTEMROOT`, falling back to `windir`
    pub system_root: Option<String>,
    /// Bundled opener, present only when it exists and is executable
    pub local_opener: Option<PathBuf>,
    /// Opener on `PATH` used when the bundled one is not usable
    pub system_opener: String,
}

impl EnvironmentSnapshot {
    /// Snapshot with no optional probe results filled in
    pub fn new(os: OperatingSystem, arch: Architecture) -> Self {
        Self {
            os,
            arch,
            is_wsl: false,
            is_container: false,
            wsl_mount_point: None,
            system_root: None,
            local_opener: None,
            system_opener: "xdg-open".to_string(),
        }
    }

    /// Mark the snapshot as running under WSL with the given mount point
    pub fn with_wsl(mut self, mount_point: impl Into<String>) -> Self {
        self.is_wsl = true;
        self.wsl_mount_point = Some(mount_point.into());
        self
    }

    /// Set container detection result
    pub fn with_container(mut self, is_container: bool) -> Self {
        self.is_container = is_container;
        self
    }

    /// Set the Windows system root
    pub fn with_system_root(mut self, root: impl Into<String>) -> Self {
        self.system_root = Some(root.into());
        self
    }

    /// Set a usable bundled opener
    pub fn with_local_opener(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_opener = Some(path.into());
        self
    }
}
