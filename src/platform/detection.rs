// Platform detection implementation

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use crate::platform::{Architecture, Environment, OperatingSystem};

/// Environment probes backed by the running system.
///
/// The WSL and container probes are computed on first use and kept for the
/// lifetime of the instance.
#[derive(Debug, Default)]
pub struct HostEnvironment {
    is_wsl: OnceLock<bool>,
    is_container: OnceLock<bool>,
}

impl HostEnvironment {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Environment for HostEnvironment {
    fn os(&self) -> OperatingSystem {
        detect_os()
    }

    fn arch(&self) -> Architecture {
        detect_architecture()
    }

    fn is_wsl(&self) -> bool {
        *self.is_wsl.get_or_init(|| {
            let detected = detect_os() == OperatingSystem::Linux
                && kernel_mentions_microsoft()
                && !self.is_container();
            log::debug!("WSL detection: {}", detected);
            detected
        })
    }

    fn is_container(&self) -> bool {
        *self.is_container.get_or_init(|| {
            let detected = is_running_in_container();
            log::debug!("Container detection: {}", detected);
            detected
        })
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }

    async fn is_executable(&self, path: &Path) -> bool {
        is_executable(path).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// Detect operating system
pub fn detect_os() -> OperatingSystem {
    #[cfg(target_os = "linux")]
    {
        OperatingSystem::Linux
    }

    #[cfg(target_os = "macos")]
    {
        OperatingSystem::MacOS
    }

    #[cfg(target_os = "windows")]
    {
        OperatingSystem::Windows
    }

    #[cfg(target_os = "android")]
    {
        OperatingSystem::Android
    }

    #[cfg(target_os = "freebsd")]
    {
        OperatingSystem::FreeBSD
    }

    #[cfg(target_os = "openbsd")]
    {
        OperatingSystem::OpenBSD
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "macos",
        target_os = "windows",
        target_os = "android",
        target_os = "freebsd",
        target_os = "openbsd"
    )))]
    {
        OperatingSystem::Unknown
    }
}

/// Detect CPU architecture
pub fn detect_architecture() -> Architecture {
    #[cfg(target_arch = "x86_64")]
    {
        Architecture::X86_64
    }

    #[cfg(target_arch = "x86")]
    {
        Architecture::X86
    }

    #[cfg(target_arch = "aarch64")]
    {
        Architecture::ARM64
    }

    #[cfg(target_arch = "arm")]
    {
        Architecture::ARM32
    }

    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "x86",
        target_arch = "aarch64",
        target_arch = "arm"
    )))]
    {
        Architecture::Unknown
    }
}

/// WSL kernels carry "microsoft" in their release string
fn kernel_mentions_microsoft() -> bool {
    ["/proc/sys/kernel/osrelease", "/proc/version"]
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .any(|content| content.to_lowercase().contains("microsoft"))
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn is_running_in_container() -> bool {
    use std::fs;

    // Docker and Podman marker files
    if fs::metadata("/.dockerenv").is_ok() || fs::metadata("/run/.containerenv").is_ok() {
        return true;
    }

    if let Ok(content) = fs::read_to_string("/proc/self/cgroup") {
        if content.contains("docker") || content.contains("lxc") || content.contains("kubepods") {
            return true;
        }
    }

    std::env::var("container").is_ok()
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn is_running_in_container() -> bool {
    false
}

#[cfg(unix)]
async fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
async fn is_executable(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
