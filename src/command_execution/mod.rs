// Command Execution Module
//
// This module turns open requests into OS commands, retries alternative
// applications, and manages the spawned processes.

pub mod error;
pub mod types;
pub mod platform;
pub mod retry;
pub mod manager;
pub mod api;

// Re-export main types
pub use error::{CommandError, CommandResult};
pub use types::*;
pub use manager::Launcher;
pub use api::LauncherBuilder;
pub use platform::{
    CommandBuilder, LaunchStrategy, ProcessHandle, ProcessSpawner, Subprocess, TokioSpawner,
};
pub use retry::try_each;
