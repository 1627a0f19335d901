// Launch strategy selection and command construction
//
// This module decides which OS mechanism opens a request and turns the
// request into a concrete command line for it.

use crate::command_execution::types::{LaunchRequest, ResolvedCommand};
use crate::platform::{EnvironmentSnapshot, OperatingSystem};

use super::{macos, unix, windows};

/// The OS mechanism used to open a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// macOS `open`
    MacOpen,
    /// `Start-Process` through Windows PowerShell, natively or from WSL
    PowerShell { via_wsl: bool },
    /// The named application itself, or the desktop opener
    Direct,
}

impl LaunchStrategy {
    /// Pick the strategy for the host and whether an application is named.
    ///
    /// WSL hands targets to Windows unless it runs inside a container or an
    /// explicit (Linux side) application was requested.
    pub fn select(os: OperatingSystem, is_wsl: bool, is_container: bool, has_app: bool) -> Self {
        match os {
            OperatingSystem::MacOS => LaunchStrategy::MacOpen,
            OperatingSystem::Windows => LaunchStrategy::PowerShell { via_wsl: false },
            _ if is_wsl && !is_container && !has_app => {
                LaunchStrategy::PowerShell { via_wsl: true }
            }
            _ => LaunchStrategy::Direct,
        }
    }

    pub fn for_snapshot(snapshot: &EnvironmentSnapshot, request: &LaunchRequest) -> Self {
        Self::select(
            snapshot.os,
            snapshot.is_wsl,
            snapshot.is_container,
            request.app.is_some(),
        )
    }
}

/// Builds the command line for a launch request.
///
/// A pure function of the snapshot and the request, so every branch can be
/// exercised without touching the host.
pub struct CommandBuilder<'a> {
    snapshot: &'a EnvironmentSnapshot,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(snapshot: &'a EnvironmentSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn strategy(&self, request: &LaunchRequest) -> LaunchStrategy {
        LaunchStrategy::for_snapshot(self.snapshot, request)
    }

    /// Build the command; the target, when present, is always the last
    /// element of the argument vector.
    pub fn build(&self, request: &LaunchRequest) -> ResolvedCommand {
        let command = match self.strategy(request) {
            LaunchStrategy::MacOpen => macos::build(request),
            LaunchStrategy::PowerShell { via_wsl } => {
                let executable = if via_wsl {
                    windows::wsl_powershell_path(self.mount_point())
                } else {
                    windows::native_powershell_path(self.snapshot.system_root.as_deref())
                };
                windows::build(request, executable, !via_wsl)
            }
            LaunchStrategy::Direct => {
                let opener = match &self.snapshot.local_opener {
                    Some(path) => path.to_string_lossy().into_owned(),
                    None => self.snapshot.system_opener.clone(),
                };
                unix::build(request, &opener)
            }
        };

        log::debug!("Built command: {}", command);
        command
    }

    fn mount_point(&self) -> &str {
        self.snapshot
            .wsl_mount_point
            .as_deref()
            .unwrap_or(crate::platform::wsl::DEFAULT_MOUNT_POINT)
    }
}
