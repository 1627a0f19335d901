use thiserror::Error;
use std::io;

/// Result type for open and launch operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Errors that can occur while resolving or launching an open request
#[derive(Error, Debug)]
pub enum CommandError {
    /// A target, name, argument list or config value has the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No application table entry for the current platform or architecture
    #[error("{0} is not supported")]
    UnsupportedPlatform(String),

    /// The default browser is not one of the known browsers
    #[error("{0} is not supported as a default browser")]
    UnsupportedBrowser(String),

    /// The default browser could not be queried
    #[error("Default browser detection failed: {0}")]
    BrowserDetection(String),

    /// The operating system failed to start or await the process
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process exited with a nonzero code while waiting for it
    #[error("Exited with code {code}")]
    NonZeroExit { code: i32 },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CommandError {
    /// Create a new invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Create a new unsupported platform error
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(platform.into())
    }

    /// Create a new unsupported browser error
    pub fn unsupported_browser(name: impl Into<String>) -> Self {
        Self::UnsupportedBrowser(name.into())
    }

    /// Create a new browser detection error
    pub fn browser_detection(reason: impl Into<String>) -> Self {
        Self::BrowserDetection(reason.into())
    }

    /// Create a new spawn error for `command`
    pub fn spawn(command: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Exit code carried by a [`CommandError::NonZeroExit`]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<toml::de::Error> for CommandError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidArgument(format!("invalid launcher config: {}", err))
    }
}
