// Well known applications
//
// Maps logical names such as "chrome" to the command that starts the app on
// the current platform, and resolves the "browser" aliases.

pub mod table;
pub mod browser;

pub use browser::{BrowserAlias, BrowserInfo, DefaultBrowser, SystemDefaultBrowser};
pub use table::{AppEntry, Binary, PlatformBinary};

use std::fmt;
use std::sync::OnceLock;

use crate::command_execution::{ApplicationName, CommandResult};
use crate::platform::Environment;

/// Applications with a built-in table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownApp {
    Chrome,
    Firefox,
    Edge,
    /// The user's default browser
    Browser,
    /// The user's default browser in private mode
    BrowserPrivate,
}

impl KnownApp {
    pub const ALL: [KnownApp; 5] = [
        KnownApp::Chrome,
        KnownApp::Firefox,
        KnownApp::Edge,
        KnownApp::Browser,
        KnownApp::BrowserPrivate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KnownApp::Chrome => "chrome",
            KnownApp::Firefox => "firefox",
            KnownApp::Edge => "edge",
            KnownApp::Browser => "browser",
            KnownApp::BrowserPrivate => "browserPrivate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.name() == name)
    }

    /// Table entry; the browser aliases have none and resolve to themselves
    pub fn entry(&self) -> Option<&'static AppEntry> {
        match self {
            KnownApp::Chrome => Some(&table::CHROME),
            KnownApp::Firefox => Some(&table::FIREFOX),
            KnownApp::Edge => Some(&table::EDGE),
            KnownApp::Browser | KnownApp::BrowserPrivate => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for KnownApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lazily resolved, per-app cached lookups into the application table.
///
/// A successful lookup is stored and returned on every later call, even if
/// the environment would now answer differently. Failed lookups are not
/// stored, so each call retries them.
#[derive(Debug, Default)]
pub struct AppResolver {
    resolved: [OnceLock<ApplicationName>; 5],
}

impl AppResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, app: KnownApp, env: &dyn Environment) -> CommandResult<ApplicationName> {
        let cell = &self.resolved[app.index()];
        if let Some(name) = cell.get() {
            return Ok(name.clone());
        }

        let name = match app.entry() {
            Some(entry) => entry.resolve(env.os(), env.arch(), env.is_wsl())?,
            None => ApplicationName::Single(app.name().to_string()),
        };
        log::debug!("Resolved {} to {}", app, name);

        Ok(cell.get_or_init(|| name).clone())
    }

    /// Cached resolution, if any
    pub fn cached(&self, app: KnownApp) -> Option<&ApplicationName> {
        self.resolved[app.index()].get()
    }
}

/// Read-only view of the known applications for one environment
pub struct Apps<'a> {
    resolver: &'a AppResolver,
    env: &'a dyn Environment,
}

impl<'a> Apps<'a> {
    pub fn new(resolver: &'a AppResolver, env: &'a dyn Environment) -> Self {
        Self { resolver, env }
    }

    pub fn get(&self, app: KnownApp) -> CommandResult<ApplicationName> {
        self.resolver.resolve(app, self.env)
    }

    pub fn chrome(&self) -> CommandResult<ApplicationName> {
        self.get(KnownApp::Chrome)
    }

    pub fn firefox(&self) -> CommandResult<ApplicationName> {
        self.get(KnownApp::Firefox)
    }

    pub fn edge(&self) -> CommandResult<ApplicationName> {
        self.get(KnownApp::Edge)
    }

    pub fn browser(&self) -> CommandResult<ApplicationName> {
        self.get(KnownApp::Browser)
    }

    pub fn browser_private(&self) -> CommandResult<ApplicationName> {
        self.get(KnownApp::BrowserPrivate)
    }
}
