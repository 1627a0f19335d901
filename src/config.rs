// Launcher configuration
//
// Hosts may embed this as a TOML table in their own config files. The
// defaults match a stock installation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::command_execution::{CommandError, CommandResult};
use crate::platform::wsl::{DEFAULT_MOUNT_POINT, WSL_CONFIG_PATH};

/// File name of the opener shipped next to the executable
pub const LOCAL_OPENER_NAME: &str = "xdg-open";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// WSL distribution config holding the `[automount] root` setting
    pub wsl_config_path: PathBuf,
    /// Mount point used when `wsl.conf` does not set one
    pub default_wsl_mount_point: String,
    /// Opener looked up on `PATH`
    pub system_opener: String,
    /// Bundled opener; defaults to `xdg-open` beside the current executable
    pub local_opener_path: Option<PathBuf>,
    /// Never use the bundled opener, e.g. inside an app runtime that ships
    /// this library without it
    pub prefer_system_opener: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            wsl_config_path: PathBuf::from(WSL_CONFIG_PATH),
            default_wsl_mount_point: DEFAULT_MOUNT_POINT.to_string(),
            system_opener: "xdg-open".to_string(),
            local_opener_path: None,
            prefer_system_opener: false,
        }
    }
}

impl LauncherConfig {
    /// Parse from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> CommandResult<Self> {
        let config: LauncherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CommandResult<()> {
        if self.system_opener.trim().is_empty() {
            return Err(CommandError::invalid_argument("system_opener must not be empty"));
        }
        if self.default_wsl_mount_point.trim().is_empty() {
            return Err(CommandError::invalid_argument(
                "default_wsl_mount_point must not be empty",
            ));
        }
        Ok(())
    }

    /// Where to look for the bundled opener.
    ///
    /// `None` when no explicit path is configured and the executable's
    /// directory cannot be determined (or is the filesystem root).
    pub fn local_opener(&self) -> Option<PathBuf> {
        if let Some(path) = &self.local_opener_path {
            return Some(path.clone());
        }

        let exe = std::env::current_exe().ok()?;
        let dir = exe.parent()?;
        if dir.as_os_str().is_empty() || dir.parent().is_none() {
            return None;
        }
        Some(dir.join(LOCAL_OPENER_NAME))
    }
}
