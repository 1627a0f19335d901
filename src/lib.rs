//! Open files, URLs and applications.
//!
//! Targets are opened with the system handler (`open` on macOS,
//! `Start-Process` on Windows and WSL, `xdg-open` elsewhere) or with a named
//! application. Application names may be alternatives tried in order, and
//! the `browser` / `browserPrivate` aliases follow the user's default
//! browser.
//!
//! ```no_run
//! use openwith::{ApplicationSpec, OpenOptions};
//!
//! # async fn run() -> openwith::CommandResult<()> {
//! openwith::open("https://example.com", OpenOptions::new()).await?;
//!
//! let firefox = ApplicationSpec::new("firefox").arg("--private-window");
//! openwith::open("https://example.com", OpenOptions::new().with_app(firefox)).await?;
//! # Ok(())
//! # }
//! ```

pub mod apps;
pub mod command_execution;
pub mod config;
pub mod platform;

pub use apps::{Apps, KnownApp};
pub use command_execution::{
    AppChoice, ApplicationName, ApplicationSpec, CommandError, CommandResult, Launcher,
    LauncherBuilder, OpenOptions, Subprocess,
};
pub use config::LauncherConfig;

use std::sync::OnceLock;

static DEFAULT_LAUNCHER: OnceLock<Launcher> = OnceLock::new();

/// Process-wide launcher for the running host, created on first use
pub fn default_launcher() -> &'static Launcher {
    DEFAULT_LAUNCHER.get_or_init(Launcher::new)
}

/// Open `target` with the default handler, or with `options.app`
pub async fn open(target: impl Into<String>, options: OpenOptions) -> CommandResult<Subprocess> {
    default_launcher().open(target, options).await
}

/// Start an application
pub async fn open_app(
    app: impl Into<ApplicationSpec>,
    options: OpenOptions,
) -> CommandResult<Subprocess> {
    default_launcher().open_app(app, options).await
}

/// Known applications resolved for the running host
pub fn apps() -> Apps<'static> {
    default_launcher().apps()
}
