// Declarative table of well known applications per platform

use crate::command_execution::{ApplicationName, CommandError, CommandResult};
use crate::platform::{Architecture, OperatingSystem};

/// A command name or ordered candidates for one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binary {
    One(&'static str),
    Candidates(&'static [&'static str]),
}

impl Binary {
    pub fn to_name(self) -> ApplicationName {
        match self {
            Binary::One(name) => ApplicationName::Single(name.to_string()),
            Binary::Candidates(names) => {
                ApplicationName::Alternatives(names.iter().map(|n| n.to_string()).collect())
            }
        }
    }
}

/// Platform entry, optionally split by architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformBinary {
    Any(Binary),
    PerArch(&'static [(Architecture, Binary)]),
}

impl PlatformBinary {
    fn for_arch(self, arch: Architecture) -> CommandResult<ApplicationName> {
        match self {
            PlatformBinary::Any(binary) => Ok(binary.to_name()),
            PlatformBinary::PerArch(entries) => entries
                .iter()
                .find(|(entry_arch, _)| *entry_arch == arch)
                .map(|(_, binary)| binary.to_name())
                .ok_or_else(|| CommandError::unsupported_platform(arch.as_str())),
        }
    }
}

/// Where an application lives on each platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppEntry {
    pub macos: Option<PlatformBinary>,
    pub windows: Option<PlatformBinary>,
    pub linux: Option<PlatformBinary>,
    /// Windows side binaries reached from WSL; overrides `linux` there
    pub wsl: Option<PlatformBinary>,
}

impl AppEntry {
    /// Look up the command for a host
    pub fn resolve(
        &self,
        os: OperatingSystem,
        arch: Architecture,
        is_wsl: bool,
    ) -> CommandResult<ApplicationName> {
        if is_wsl {
            if let Some(wsl) = self.wsl {
                return wsl.for_arch(arch);
            }
        }

        let entry = match os {
            OperatingSystem::MacOS => self.macos,
            OperatingSystem::Windows => self.windows,
            OperatingSystem::Linux => self.linux,
            _ => None,
        };

        entry
            .ok_or_else(|| CommandError::unsupported_platform(os.as_str()))?
            .for_arch(arch)
    }
}

pub const CHROME: AppEntry = AppEntry {
    macos: Some(PlatformBinary::Any(Binary::One("google chrome"))),
    windows: Some(PlatformBinary::Any(Binary::One("chrome"))),
    linux: Some(PlatformBinary::Any(Binary::Candidates(&[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
    ]))),
    wsl: Some(PlatformBinary::PerArch(&[
        (
            Architecture::X86,
            Binary::One("/mnt/c/Program Files (x86)/Google/Chrome/Application/chrome.exe"),
        ),
        (
            Architecture::X86_64,
            Binary::Candidates(&[
                "/mnt/c/Program Files/Google/Chrome/Application/chrome.exe",
                "/mnt/c/Program Files (x86)/Google/Chrome/Application/chrome.exe",
            ]),
        ),
    ])),
};

pub const FIREFOX: AppEntry = AppEntry {
    macos: Some(PlatformBinary::Any(Binary::One("firefox"))),
    windows: Some(PlatformBinary::Any(Binary::One(
        "C:\\Program Files\\Mozilla Firefox\\firefox.exe",
    ))),
    linux: Some(PlatformBinary::Any(Binary::One("firefox"))),
    wsl: Some(PlatformBinary::Any(Binary::One(
        "/mnt/c/Program Files/Mozilla Firefox/firefox.exe",
    ))),
};

pub const EDGE: AppEntry = AppEntry {
    macos: Some(PlatformBinary::Any(Binary::One("microsoft edge"))),
    windows: Some(PlatformBinary::Any(Binary::One("msedge"))),
    linux: Some(PlatformBinary::Any(Binary::Candidates(&[
        "microsoft-edge",
        "microsoft-edge-dev",
    ]))),
    wsl: Some(PlatformBinary::Any(Binary::One(
        "/mnt/c/Program Files (x86)/Microsoft/Edge/Application/msedge.exe",
    ))),
};
