use serde::{Deserialize, Serialize};
use std::fmt;

use crate::command_execution::error::{CommandError, CommandResult};

/// Name of an application, or ordered alternatives tried until one launches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApplicationName {
    Single(String),
    Alternatives(Vec<String>),
}

impl ApplicationName {
    /// Reject empty alternative lists.
    ///
    /// An empty name is accepted and means "no application".
    pub fn validate(&self) -> CommandResult<()> {
        match self {
            ApplicationName::Alternatives(names) if names.is_empty() => Err(
                CommandError::invalid_argument("Expected at least one application name"),
            ),
            _ => Ok(()),
        }
    }

    /// Names in the order they are tried
    pub fn names(&self) -> Vec<&str> {
        match self {
            ApplicationName::Single(name) => vec![name.as_str()],
            ApplicationName::Alternatives(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationName::Single(name) => f.write_str(name),
            ApplicationName::Alternatives(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

impl From<&str> for ApplicationName {
    fn from(name: &str) -> Self {
        ApplicationName::Single(name.to_string())
    }
}

impl From<String> for ApplicationName {
    fn from(name: String) -> Self {
        ApplicationName::Single(name)
    }
}

impl From<Vec<String>> for ApplicationName {
    fn from(names: Vec<String>) -> Self {
        ApplicationName::Alternatives(names)
    }
}

impl From<Vec<&str>> for ApplicationName {
    fn from(names: Vec<&str>) -> Self {
        ApplicationName::Alternatives(names.into_iter().map(str::to_string).collect())
    }
}

/// An application to open the target with, plus its own CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    pub name: ApplicationName,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl ApplicationSpec {
    pub fn new(name: impl Into<ApplicationName>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Append one argument passed to the application
    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Set the arguments passed to the application
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for ApplicationSpec {
    fn from(name: &str) -> Self {
        ApplicationSpec::new(name)
    }
}

impl From<ApplicationName> for ApplicationSpec {
    fn from(name: ApplicationName) -> Self {
        ApplicationSpec::new(name)
    }
}

/// The `app` option: one application spec or ordered alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppChoice {
    Single(ApplicationSpec),
    Alternatives(Vec<ApplicationSpec>),
}

impl AppChoice {
    pub fn validate(&self) -> CommandResult<()> {
        match self {
            AppChoice::Single(spec) => spec.name.validate(),
            AppChoice::Alternatives(specs) if specs.is_empty() => Err(
                CommandError::invalid_argument("Expected at least one application"),
            ),
            AppChoice::Alternatives(specs) => {
                specs.iter().try_for_each(|spec| spec.name.validate())
            }
        }
    }
}

impl From<ApplicationSpec> for AppChoice {
    fn from(spec: ApplicationSpec) -> Self {
        AppChoice::Single(spec)
    }
}

impl From<Vec<ApplicationSpec>> for AppChoice {
    fn from(specs: Vec<ApplicationSpec>) -> Self {
        AppChoice::Alternatives(specs)
    }
}

impl From<&str> for AppChoice {
    fn from(name: &str) -> Self {
        AppChoice::Single(ApplicationSpec::new(name))
    }
}

/// Options shared by [`open`](crate::open) and [`open_app`](crate::open_app)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenOptions {
    /// Wait for the launched process to exit
    pub wait: bool,
    /// macOS only: do not bring the app to the foreground
    pub background: bool,
    /// macOS only: open a new instance even if one is running
    pub new_instance: bool,
    /// Accept a nonzero exit code when waiting
    pub allow_nonzero_exit_code: bool,
    /// Application to open the target with
    pub app: Option<AppChoice>,
    /// File, URL or identifier to open
    pub target: Option<String>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn with_new_instance(mut self, new_instance: bool) -> Self {
        self.new_instance = new_instance;
        self
    }

    pub fn with_allow_nonzero_exit_code(mut self, allow: bool) -> Self {
        self.allow_nonzero_exit_code = allow;
        self
    }

    pub fn with_app(mut self, app: impl Into<AppChoice>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Check the request shape before anything is resolved or spawned
    pub fn validate(&self) -> CommandResult<()> {
        match &self.app {
            Some(app) => app.validate(),
            None => Ok(()),
        }
    }
}

/// One concrete launch attempt: at most one application name, already
/// resolved from aliases and alternatives. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub target: Option<String>,
    pub app: Option<String>,
    pub arguments: Vec<String>,
    pub wait: bool,
    pub background: bool,
    pub new_instance: bool,
}

impl LaunchRequest {
    pub fn from_options(
        options: &OpenOptions,
        app: Option<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            target: options.target.clone().filter(|target| !target.is_empty()),
            app: app.filter(|app| !app.is_empty()),
            arguments,
            wait: options.wait,
            background: options.background,
            new_instance: options.new_instance,
        }
    }
}

/// How the child's standard streams are wired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdioMode {
    #[default]
    Inherit,
    Ignore,
}

/// Platform specific spawn settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Run the child outside the caller's process group
    pub detached: bool,
    pub stdio: StdioMode,
    /// Windows: pass arguments without re-quoting
    pub verbatim_arguments: bool,
}

/// A command ready to be handed to the spawner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub executable: String,
    pub args: Vec<String>,
    pub options: SpawnOptions,
}

impl ResolvedCommand {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            options: SpawnOptions::default(),
        }
    }

    /// Position of `arg` in the argument vector
    pub fn position(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|a| a == arg)
    }

    /// Argument following `flag`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.position(flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
