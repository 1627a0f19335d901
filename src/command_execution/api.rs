// Launcher construction and loosely typed entry points
//
// The value based functions serve hosts that receive requests as JSON, such
// as language bindings. They check the shape of every input before anything
// is resolved or spawned.

use serde_json::Value;
use std::sync::Arc;

use crate::apps::{AppResolver, DefaultBrowser, SystemDefaultBrowser};
use crate::command_execution::{
    error::{CommandError, CommandResult},
    manager::Launcher,
    platform::{ProcessSpawner, Subprocess, TokioSpawner},
    types::{ApplicationName, ApplicationSpec, OpenOptions},
};
use crate::config::LauncherConfig;
use crate::platform::{Environment, HostEnvironment, WslMountPoint};

/// Builder for [`Launcher`]
#[derive(Default)]
pub struct LauncherBuilder {
    environment: Option<Arc<dyn Environment>>,
    default_browser: Option<Arc<dyn DefaultBrowser>>,
    spawner: Option<Arc<dyn ProcessSpawner>>,
    config: LauncherConfig,
}

impl LauncherBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set environment probes
    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set default browser service
    pub fn default_browser(mut self, service: Arc<dyn DefaultBrowser>) -> Self {
        self.default_browser = Some(service);
        self
    }

    /// Set process spawner
    pub fn spawner(mut self, spawner: Arc<dyn ProcessSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Set configuration
    pub fn config(mut self, config: LauncherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Launcher {
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(HostEnvironment::new()));
        let browser = self
            .default_browser
            .unwrap_or_else(|| Arc::new(SystemDefaultBrowser::new(environment.os())));
        let mount_point = WslMountPoint::new(
            self.config.wsl_config_path.clone(),
            self.config.default_wsl_mount_point.clone(),
        );

        Launcher {
            env: environment,
            browser,
            spawner: self.spawner.unwrap_or_else(|| Arc::new(TokioSpawner::new())),
            config: self.config,
            mount_point,
            apps: AppResolver::new(),
        }
    }
}

impl Launcher {
    pub fn builder() -> LauncherBuilder {
        LauncherBuilder::new()
    }

    /// [`Launcher::open`] for an untyped target and options object
    pub async fn open_value(&self, target: &Value, options: &Value) -> CommandResult<Subprocess> {
        let target = target
            .as_str()
            .ok_or_else(|| CommandError::invalid_argument("Expected a `target`"))?;
        let options = options_from_value(options)?;
        self.open(target, options).await
    }

    /// [`Launcher::open_app`] for an untyped name and options object.
    ///
    /// The app's arguments come from the `arguments` key of `options`.
    pub async fn open_app_value(&self, name: &Value, options: &Value) -> CommandResult<Subprocess> {
        const ARGUMENTS_MESSAGE: &str = "Expected `appArguments` as Array type";

        let name = name_from_value(name)?;
        let arguments = match options.get("arguments") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => strings_from_values(items, ARGUMENTS_MESSAGE)?,
            Some(_) => return Err(CommandError::invalid_argument(ARGUMENTS_MESSAGE)),
        };
        let options = options_from_value(options)?;

        self.open_app(ApplicationSpec { name, arguments }, options).await
    }
}

fn options_from_value(value: &Value) -> CommandResult<OpenOptions> {
    match value {
        Value::Null => Ok(OpenOptions::default()),
        Value::Object(_) => Ok(serde_json::from_value(value.clone())?),
        _ => Err(CommandError::invalid_argument("Expected options to be an object")),
    }
}

fn name_from_value(value: &Value) -> CommandResult<ApplicationName> {
    const MESSAGE: &str = "Expected a valid `name`";

    match value {
        Value::String(name) => Ok(ApplicationName::Single(name.clone())),
        Value::Array(items) => {
            Ok(ApplicationName::Alternatives(strings_from_values(items, MESSAGE)?))
        }
        _ => Err(CommandError::invalid_argument(MESSAGE)),
    }
}

fn strings_from_values(items: &[Value], message: &str) -> CommandResult<Vec<String>> {
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CommandError::invalid_argument(message))
        })
        .collect()
}
