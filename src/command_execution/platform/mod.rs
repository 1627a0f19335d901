// Platform-specific command construction and process spawning
//
// The builders are plain functions over an environment snapshot, so every
// platform branch compiles and is tested on every host. Only the spawner
// touches the real OS.

pub mod macos;
pub mod windows;
pub mod unix;

pub mod translator;
pub mod executor;

pub use translator::{CommandBuilder, LaunchStrategy};
pub use executor::{ProcessHandle, ProcessSpawner, Subprocess, TokioSpawner};
pub use windows::{encode_powershell_command, quote_for_nested_shell};
