// Open request dispatch
//
// Expands app alternatives and browser aliases into concrete launch
// attempts, builds the command for the host and manages the spawned
// process.

use std::path::PathBuf;
use std::sync::Arc;

use crate::apps::browser::{self, BrowserAlias, DefaultBrowser};
use crate::apps::{AppResolver, Apps};
use crate::command_execution::{
    error::{CommandError, CommandResult},
    platform::{CommandBuilder, LaunchStrategy, ProcessSpawner, Subprocess},
    retry::try_each,
    types::{AppChoice, ApplicationName, ApplicationSpec, LaunchRequest, OpenOptions},
};
use crate::config::LauncherConfig;
use crate::platform::{Environment, EnvironmentSnapshot, OperatingSystem, WslMountPoint};

/// Opens targets and applications.
///
/// Owns the environment probes and the caches that depend on them (WSL
/// mount point, application table lookups), so two launchers never share
/// cached state.
pub struct Launcher {
    pub(crate) env: Arc<dyn Environment>,
    pub(crate) browser: Arc<dyn DefaultBrowser>,
    pub(crate) spawner: Arc<dyn ProcessSpawner>,
    pub(crate) config: LauncherConfig,
    pub(crate) mount_point: WslMountPoint,
    pub(crate) apps: AppResolver,
}

impl Launcher {
    /// Launcher for the running host
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Known applications, resolved for this launcher's environment
    pub fn apps(&self) -> Apps<'_> {
        Apps::new(&self.apps, self.env.as_ref())
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Cached WSL mount point, once `wsl.conf` has been read
    pub fn wsl_mount_point(&self) -> Option<&str> {
        self.mount_point.cached()
    }

    /// Open `target` with the default handler or `options.app`
    pub async fn open(
        &self,
        target: impl Into<String>,
        options: OpenOptions,
    ) -> CommandResult<Subprocess> {
        self.open_with(OpenOptions {
            target: Some(target.into()),
            ..options
        })
        .await
    }

    /// Start an application, replacing any `options.app`
    pub async fn open_app(
        &self,
        app: impl Into<ApplicationSpec>,
        options: OpenOptions,
    ) -> CommandResult<Subprocess> {
        let app = app.into();
        app.name.validate()?;

        self.open_with(OpenOptions {
            app: Some(AppChoice::Single(app)),
            ..options
        })
        .await
    }

    /// Run a fully described request
    pub async fn open_with(&self, options: OpenOptions) -> CommandResult<Subprocess> {
        options.validate()?;

        match &options.app {
            None => self.launch(&options, None, Vec::new()).await,
            Some(AppChoice::Single(spec)) => self.open_spec(&options, spec).await,
            Some(AppChoice::Alternatives(specs)) => {
                try_each(specs, |spec| self.open_spec(&options, spec)).await
            }
        }
    }

    async fn open_spec(
        &self,
        options: &OpenOptions,
        spec: &ApplicationSpec,
    ) -> CommandResult<Subprocess> {
        match &spec.name {
            ApplicationName::Single(name) => {
                self.open_named(options, name, spec.arguments.clone()).await
            }
            ApplicationName::Alternatives(names) => {
                try_each(names, |name| {
                    self.open_named(options, name, spec.arguments.clone())
                })
                .await
            }
        }
    }

    async fn open_named(
        &self,
        options: &OpenOptions,
        name: &str,
        arguments: Vec<String>,
    ) -> CommandResult<Subprocess> {
        let Some(alias) = BrowserAlias::from_name(name) else {
            return self.launch(options, Some(name.to_string()), arguments).await;
        };

        let (app, arguments) =
            browser::resolve_alias(alias, self.browser.as_ref(), arguments).await?;

        match self.apps.resolve(app, self.env.as_ref())? {
            ApplicationName::Single(name) => self.launch(options, Some(name), arguments).await,
            ApplicationName::Alternatives(names) => {
                try_each(names, |name| {
                    self.launch(options, Some(name), arguments.clone())
                })
                .await
            }
        }
    }

    /// One attempt: build, spawn, and either detach or await the process
    async fn launch(
        &self,
        options: &OpenOptions,
        app: Option<String>,
        arguments: Vec<String>,
    ) -> CommandResult<Subprocess> {
        let request = LaunchRequest::from_options(options, app, arguments);
        let snapshot = self.snapshot_for(&request).await;
        let command = CommandBuilder::new(&snapshot).build(&request);

        log::info!("Launching {}", command);
        let handle = self
            .spawner
            .spawn(&command)
            .map_err(|e| CommandError::spawn(command.executable.clone(), e))?;
        let mut process = Subprocess::new(command, handle);

        if !options.wait {
            return Ok(process);
        }

        match process.wait().await? {
            Some(code) if code != 0 && !options.allow_nonzero_exit_code => {
                Err(CommandError::NonZeroExit { code })
            }
            _ => Ok(process),
        }
    }

    /// Probe only what the chosen launch strategy needs
    async fn snapshot_for(&self, request: &LaunchRequest) -> EnvironmentSnapshot {
        let env = self.env.as_ref();
        let mut snapshot = EnvironmentSnapshot::new(env.os(), env.arch());
        snapshot.is_wsl = env.is_wsl();
        snapshot.is_container = env.is_container();
        snapshot.system_opener = self.config.system_opener.clone();

        match LaunchStrategy::for_snapshot(&snapshot, request) {
            LaunchStrategy::PowerShell { via_wsl: true } => {
                snapshot.wsl_mount_point = Some(self.mount_point.resolve(env).await);
            }
            LaunchStrategy::PowerShell { via_wsl: false } => {
                snapshot.system_root = env.env_var("SYSTEMROOT").or_else(|| env.env_var("windir"));
            }
            LaunchStrategy::Direct if request.app.is_none() => {
                snapshot.local_opener = self.usable_local_opener(snapshot.os).await;
            }
            _ => {}
        }

        snapshot
    }

    async fn usable_local_opener(&self, os: OperatingSystem) -> Option<PathBuf> {
        if self.config.prefer_system_opener || os == OperatingSystem::Android {
            return None;
        }

        let path = self.config.local_opener()?;
        if self.env.is_executable(&path).await {
            Some(path)
        } else {
            log::debug!("Bundled opener {} is not usable", path.display());
            None
        }
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}
