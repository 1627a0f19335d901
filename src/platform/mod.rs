// Platform abstraction
//
// This module provides host detection (OS family, architecture, WSL and
// container probes) and the WSL drive mount point lookup.

pub mod types;
pub mod traits;
pub mod detection;
pub mod wsl;

// Re-exports
pub use types::*;
pub use traits::*;
pub use detection::{HostEnvironment, detect_architecture, detect_os};
pub use wsl::{WslMountPoint, parse_mount_point};
