//! Default browser lookup and the `browser` / `browserPrivate` aliases.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tokio::process::Command;

use crate::apps::KnownApp;
use crate::command_execution::{CommandError, CommandResult};
use crate::platform::OperatingSystem;

/// Identity of the default browser as reported by the OS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    /// Bundle id (macOS) or desktop entry id (Linux)
    pub id: String,
    /// Human readable name
    pub name: String,
}

impl BrowserInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Default browser service
#[async_trait]
pub trait DefaultBrowser: Send + Sync {
    async fn default_browser(&self) -> CommandResult<BrowserInfo>;
}

/// The two alias names resolved through the default browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAlias {
    Browser,
    BrowserPrivate,
}

impl BrowserAlias {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "browser" => Some(BrowserAlias::Browser),
            "browserPrivate" => Some(BrowserAlias::BrowserPrivate),
            _ => None,
        }
    }
}

/// Map a default browser id to a known browser
pub fn known_browser(id: &str) -> Option<KnownApp> {
    match id {
        "com.google.chrome" | "google-chrome.desktop" => Some(KnownApp::Chrome),
        "org.mozilla.firefox" | "firefox.desktop" => Some(KnownApp::Firefox),
        "com.microsoft.msedge" | "com.microsoft.edge" | "microsoft-edge.desktop" => {
            Some(KnownApp::Edge)
        }
        _ => None,
    }
}

/// Private browsing flag of a known browser
pub fn private_flag(app: KnownApp) -> Option<&'static str> {
    match app {
        KnownApp::Chrome => Some("--incognito"),
        KnownApp::Firefox => Some("--private-window"),
        KnownApp::Edge => Some("--inPrivate"),
        KnownApp::Browser | KnownApp::BrowserPrivate => None,
    }
}

/// Resolve an alias to a concrete browser, adding the private browsing flag
/// to `arguments` for [`BrowserAlias::BrowserPrivate`].
pub async fn resolve_alias(
    alias: BrowserAlias,
    service: &dyn DefaultBrowser,
    mut arguments: Vec<String>,
) -> CommandResult<(KnownApp, Vec<String>)> {
    let browser = service.default_browser().await?;
    log::debug!("Default browser: {} ({})", browser.name, browser.id);

    let app = known_browser(&browser.id)
        .ok_or_else(|| CommandError::unsupported_browser(browser.name.clone()))?;

    if alias == BrowserAlias::BrowserPrivate {
        if let Some(flag) = private_flag(app) {
            arguments.push(flag.to_string());
        }
    }

    Ok((app, arguments))
}

/// Queries the host for its default browser
#[derive(Debug, Clone, Copy)]
pub struct SystemDefaultBrowser {
    os: OperatingSystem,
}

impl SystemDefaultBrowser {
    pub fn new(os: OperatingSystem) -> Self {
        Self { os }
    }

    async fn run(program: &str, args: &[&str]) -> CommandResult<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| CommandError::spawn(program, e))?;

        if !output.status.success() {
            return Err(CommandError::browser_detection(format!(
                "`{}` failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SystemDefaultBrowser {
    fn default() -> Self {
        Self::new(crate::platform::detect_os())
    }
}

#[async_trait]
impl DefaultBrowser for SystemDefaultBrowser {
    async fn default_browser(&self) -> CommandResult<BrowserInfo> {
        match self.os {
            OperatingSystem::MacOS => {
                let output = Self::run(
                    "defaults",
                    &[
                        "read",
                        "com.apple.LaunchServices/com.apple.launchservices.secure",
                        "LSHandlers",
                    ],
                )
                .await;
                // No LSHandlers entry means Safari was never replaced
                let id = output
                    .ok()
                    .and_then(|out| parse_macos_handlers(&out))
                    .unwrap_or_else(|| SAFARI_ID.to_string());
                Ok(macos_browser(&id))
            }
            OperatingSystem::Windows => {
                let output = Self::run(
                    "reg",
                    &[
                        "QUERY",
                        WINDOWS_USER_CHOICE_KEY,
                        "/v",
                        "ProgId",
                    ],
                )
                .await?;
                let prog_id = parse_reg_prog_id(&output).ok_or_else(|| {
                    CommandError::browser_detection("Cannot find Windows browser in stdout")
                })?;
                windows_browser(&prog_id)
            }
            OperatingSystem::Linux | OperatingSystem::FreeBSD | OperatingSystem::OpenBSD => {
                let output =
                    Self::run("xdg-mime", &["query", "default", "x-scheme-handler/http"]).await?;
                linux_browser(&output)
            }
            other => Err(CommandError::browser_detection(format!(
                "default browser lookup is not available on {}",
                other
            ))),
        }
    }
}

const SAFARI_ID: &str = "com.apple.Safari";

const WINDOWS_USER_CHOICE_KEY: &str =
    "HKEY_CURRENT_USER\\Software\\Microsoft\\Windows\\Shell\\Associations\\UrlAssociations\\http\\UserChoice";

static MACOS_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"LSHandlerRoleAll = "([^"]+?)";\s+?LSHandlerURLScheme = (?:http|https);"#)
        .expect("handler pattern is valid")
});

/// Bundle id of the http(s) handler in `defaults read ... LSHandlers` output
pub fn parse_macos_handlers(output: &str) -> Option<String> {
    MACOS_HANDLER
        .captures_iter(output)
        .filter_map(|captures| captures.get(1))
        .map(|id| id.as_str())
        // "-" marks a role that was reset
        .find(|id| !id.starts_with('-'))
        .map(str::to_string)
}

fn macos_browser(id: &str) -> BrowserInfo {
    let name = match id.to_lowercase().as_str() {
        "com.apple.safari" => "Safari",
        "com.google.chrome" => "Google Chrome",
        "org.mozilla.firefox" => "Firefox",
        "com.microsoft.edgemac" | "com.microsoft.edge" => "Microsoft Edge",
        "com.brave.browser" => "Brave Browser",
        _ => id.rsplit('.').next().unwrap_or(id),
    };
    BrowserInfo::new(id, name)
}

/// `ProgId` value in `reg query` output
pub fn parse_reg_prog_id(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("ProgId"))
        .and_then(|line| line.split_whitespace().nth(2))
        .map(str::to_string)
}

/// Map a Windows `ProgId` to the ids used on other platforms
pub fn windows_browser(prog_id: &str) -> CommandResult<BrowserInfo> {
    // Firefox registers a per-install suffix, e.g. FirefoxURL-308046B0AF4A39CB
    let base = prog_id.split('-').next().unwrap_or(prog_id);

    let (id, name) = match base {
        "MSEdgeHTM" | "MSEdgeDHTML" => ("com.microsoft.edge", "Edge"),
        "AppXq0fevzme2pys62n3e0fbqa7peapykr8v" => ("com.microsoft.edge.old", "Edge"),
        "IE.HTTP" => ("com.microsoft.ie", "Internet Explorer"),
        "FirefoxURL" | "FirefoxHTML" => ("org.mozilla.firefox", "Firefox"),
        "ChromeHTML" => ("com.google.chrome", "Chrome"),
        "BraveHTML" => ("com.brave.Browser", "Brave"),
        "BraveBHTML" => ("com.brave.Browser.beta", "Brave Beta"),
        "BraveSSHTM" => ("com.brave.Browser.nightly", "Brave Nightly"),
        _ => {
            return Err(CommandError::browser_detection(format!(
                "Unknown browser ID: {}",
                prog_id
            )));
        }
    };

    Ok(BrowserInfo::new(id, name))
}

/// Desktop entry from `xdg-mime query default` output
pub fn linux_browser(output: &str) -> CommandResult<BrowserInfo> {
    let id = output.trim();
    if id.is_empty() {
        return Err(CommandError::browser_detection("no default browser configured"));
    }

    let name = id
        .trim_end_matches(".desktop")
        .replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(BrowserInfo::new(id, name))
}
