//! WSL drive mount point discovery.
//!
//! The Windows drives are mounted under `/mnt/` unless `/etc/wsl.conf`
//! overrides it with an `[automount]` `root = ...` line.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

use crate::platform::Environment;

/// Default `root` value of `[automount]` in `wsl.conf`
pub const DEFAULT_MOUNT_POINT: &str = "/mnt/";

/// Location of the WSL distribution config file
pub const WSL_CONFIG_PATH: &str = "/etc/wsl.conf";

static ROOT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"root\s*=\s*(.*)").expect("root pattern is valid")
});

/// Extract the mount point from `wsl.conf` content.
///
/// Takes the first `root = <value>` match that has no `#` before it on the
/// same line. This is a line-local heuristic: a `#` after the value is kept
/// as part of the value, and `\s` may span a line break between `root`, `=`
/// and the value. The result always ends with `/`.
pub fn parse_mount_point(content: &str) -> Option<String> {
    let mut start = 0;

    while start <= content.len() {
        let captures = ROOT_PATTERN.captures_at(content, start)?;
        let whole = captures.get(0)?;

        if !commented_out(content, whole.start()) {
            let value = captures.get(1)?.as_str().trim();
            return Some(with_trailing_slash(value));
        }

        // Retry from the next character so overlapping matches are seen
        start = whole.start() + 1;
        while !content.is_char_boundary(start) {
            start += 1;
        }
    }

    None
}

/// A `#` earlier on the same line disqualifies a match
fn commented_out(content: &str, position: usize) -> bool {
    let line_start = content[..position].rfind('\n').map_or(0, |i| i + 1);
    content[line_start..position].contains('#')
}

fn with_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

/// Memoized mount point lookup.
///
/// A missing or unreadable config yields the default without caching it, so a
/// later call looks again. Once the file has been read, its value (or the
/// default when it has no `root` line) is cached and the file is not read
/// again.
#[derive(Debug)]
pub struct WslMountPoint {
    config_path: PathBuf,
    default_mount_point: String,
    cached: OnceLock<String>,
}

impl WslMountPoint {
    pub fn new(config_path: impl Into<PathBuf>, default_mount_point: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            default_mount_point: with_trailing_slash(&default_mount_point.into()),
            cached: OnceLock::new(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Cached value, if the config file has been read already
    pub fn cached(&self) -> Option<&str> {
        self.cached.get().map(String::as_str)
    }

    /// Resolve the mount point, reading the config file at most once
    pub async fn resolve(&self, env: &dyn Environment) -> String {
        if let Some(mount_point) = self.cached.get() {
            return mount_point.clone();
        }

        let content = match env.read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) => {
                log::debug!(
                    "Cannot read {}: {}, using {}",
                    self.config_path.display(),
                    e,
                    self.default_mount_point
                );
                return self.default_mount_point.clone();
            }
        };

        let mount_point =
            parse_mount_point(&content).unwrap_or_else(|| self.default_mount_point.clone());
        log::debug!("WSL drives mount point: {}", mount_point);

        // Racing first readers converge on whichever value was stored first
        self.cached.get_or_init(|| mount_point).clone()
    }
}

impl Default for WslMountPoint {
    fn default() -> Self {
        Self::new(WSL_CONFIG_PATH, DEFAULT_MOUNT_POINT)
    }
}
