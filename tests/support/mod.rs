// Fakes for the launcher's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use openwith::apps::{BrowserInfo, DefaultBrowser};
use openwith::command_execution::{ProcessHandle, ProcessSpawner, ResolvedCommand};
use openwith::platform::{Architecture, Environment, OperatingSystem};
use openwith::{CommandResult, Launcher, LauncherConfig};

pub struct FakeEnv {
    pub os: OperatingSystem,
    pub arch: Architecture,
    pub wsl: bool,
    pub container: bool,
    pub vars: HashMap<String, String>,
    pub executables: HashSet<PathBuf>,
    pub files: HashMap<PathBuf, String>,
    pub reads: AtomicUsize,
}

impl FakeEnv {
    pub fn new(os: OperatingSystem) -> Self {
        Self {
            os,
            arch: Architecture::X86_64,
            wsl: false,
            container: false,
            vars: HashMap::new(),
            executables: HashSet::new(),
            files: HashMap::new(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn wsl() -> Self {
        let mut env = Self::new(OperatingSystem::Linux);
        env.wsl = true;
        env
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }

    pub fn with_executable(mut self, path: &str) -> Self {
        self.executables.insert(PathBuf::from(path));
        self
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Environment for FakeEnv {
    fn os(&self) -> OperatingSystem {
        self.os
    }

    fn arch(&self) -> Architecture {
        self.arch
    }

    fn is_wsl(&self) -> bool {
        self.wsl
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    async fn is_executable(&self, path: &Path) -> bool {
        self.executables.contains(path)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }
}

pub struct FakeBrowser {
    pub info: BrowserInfo,
    pub queries: AtomicUsize,
}

impl FakeBrowser {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            info: BrowserInfo::new(id, name),
            queries: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DefaultBrowser for FakeBrowser {
    async fn default_browser(&self) -> CommandResult<BrowserInfo> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.clone())
    }
}

/// What a fake process does for a given executable
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    NotFound,
    Exit(i32),
    Signal,
}

#[derive(Default)]
pub struct RecordingSpawner {
    pub commands: Mutex<Vec<ResolvedCommand>>,
    pub outcomes: Mutex<HashMap<String, Outcome>>,
    pub waits: Arc<AtomicUsize>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(self, executable: &str, outcome: Outcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(executable.to_string(), outcome);
        self
    }

    pub fn commands(&self) -> Vec<ResolvedCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn executables(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .map(|command| command.executable)
            .collect()
    }

    pub fn last(&self) -> ResolvedCommand {
        self.commands().pop().expect("nothing was spawned")
    }

    pub fn wait_count(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, command: &ResolvedCommand) -> io::Result<Box<dyn ProcessHandle>> {
        self.commands.lock().unwrap().push(command.clone());

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&command.executable)
            .copied()
            .unwrap_or(Outcome::Exit(0));

        match outcome {
            Outcome::NotFound => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", command.executable),
            )),
            Outcome::Exit(code) => Ok(Box::new(FakeProcess {
                code: Some(code),
                waits: self.waits.clone(),
            })),
            Outcome::Signal => Ok(Box::new(FakeProcess {
                code: None,
                waits: self.waits.clone(),
            })),
        }
    }
}

#[derive(Debug)]
struct FakeProcess {
    code: Option<i32>,
    waits: Arc<AtomicUsize>,
}

#[async_trait]
impl ProcessHandle for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        Ok(self.code)
    }

    async fn kill(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub env: Arc<FakeEnv>,
    pub browser: Arc<FakeBrowser>,
    pub spawner: Arc<RecordingSpawner>,
    pub launcher: Launcher,
}

impl Harness {
    pub fn new(env: FakeEnv, spawner: RecordingSpawner) -> Self {
        Self::with_browser(env, spawner, FakeBrowser::new("firefox.desktop", "Firefox"))
    }

    pub fn with_browser(env: FakeEnv, spawner: RecordingSpawner, browser: FakeBrowser) -> Self {
        Self::with_config(env, spawner, browser, LauncherConfig::default())
    }

    pub fn with_config(
        env: FakeEnv,
        spawner: RecordingSpawner,
        browser: FakeBrowser,
        config: LauncherConfig,
    ) -> Self {
        let env = Arc::new(env);
        let browser = Arc::new(browser);
        let spawner = Arc::new(spawner);
        let launcher = Launcher::builder()
            .environment(env.clone())
            .default_browser(browser.clone())
            .spawner(spawner.clone())
            .config(config)
            .build();

        Self {
            env,
            browser,
            spawner,
            launcher,
        }
    }
}
