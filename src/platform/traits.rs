// Platform abstraction traits

use async_trait::async_trait;
use std::io;
use std::path::Path;

use crate::platform::{Architecture, OperatingSystem};

/// Host probes the launcher depends on.
///
/// [`HostEnvironment`](crate::platform::HostEnvironment) talks to the real
/// system; tests inject fakes to drive every launch branch from one machine.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Operating system family
    fn os(&self) -> OperatingSystem;

    /// CPU architecture
    fn arch(&self) -> Architecture;

    /// Check if running under the Windows Subsystem for Linux
    fn is_wsl(&self) -> bool;

    /// Check if running inside a container
    fn is_container(&self) -> bool;

    /// Read an environment variable
    fn env_var(&self, key: &str) -> Option<String>;

    /// Check whether `path` exists and may be executed by this process
    async fn is_executable(&self, path: &Path) -> bool;

    /// Read a UTF-8 file
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
