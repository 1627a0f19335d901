// Process spawning and the handle returned to callers

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::command_execution::{
    error::{CommandError, CommandResult},
    types::{ResolvedCommand, StdioMode},
};

/// A started process
#[async_trait]
pub trait ProcessHandle: Send + fmt::Debug {
    /// OS process id, if the process is still known to the OS
    fn id(&self) -> Option<u32>;

    /// Wait for the process to exit; `None` when it was killed by a signal
    async fn wait(&mut self) -> io::Result<Option<i32>>;

    /// Forcefully terminate the process
    async fn kill(&mut self) -> io::Result<()>;
}

/// The spawn primitive: start a resolved command
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, command: &ResolvedCommand) -> io::Result<Box<dyn ProcessHandle>>;
}

/// Spawner backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSpawner;

impl TokioSpawner {
    pub fn new() -> Self {
        Self
    }

    fn configure(command: &ResolvedCommand) -> Command {
        let mut cmd = Command::new(&command.executable);

        #[cfg(windows)]
        {
            if command.options.verbatim_arguments {
                for arg in &command.args {
                    cmd.raw_arg(arg);
                }
            } else {
                cmd.args(&command.args);
            }
        }

        #[cfg(not(windows))]
        cmd.args(&command.args);

        if command.options.stdio == StdioMode::Ignore {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());
        }

        if command.options.detached {
            #[cfg(unix)]
            cmd.process_group(0);

            #[cfg(windows)]
            {
                const DETACHED_PROCESS: u32 = 0x0000_0008;
                const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
                cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
            }
        }

        // Dropping the handle must never take the launched app down with it
        cmd.kill_on_drop(false);
        cmd
    }
}

impl ProcessSpawner for TokioSpawner {
    fn spawn(&self, command: &ResolvedCommand) -> io::Result<Box<dyn ProcessHandle>> {
        let child = Self::configure(command).spawn()?;
        Ok(Box::new(TokioProcess { child }))
    }
}

#[derive(Debug)]
struct TokioProcess {
    child: Child,
}

#[async_trait]
impl ProcessHandle for TokioProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.child.kill().await
    }
}

/// Handle to a launched process, as returned by the open operations
#[derive(Debug)]
pub struct Subprocess {
    command: ResolvedCommand,
    handle: Box<dyn ProcessHandle>,
    exit_code: Option<i32>,
}

impl Subprocess {
    pub(crate) fn new(command: ResolvedCommand, handle: Box<dyn ProcessHandle>) -> Self {
        Self {
            command,
            handle,
            exit_code: None,
        }
    }

    /// The command line that was spawned
    pub fn command(&self) -> &ResolvedCommand {
        &self.command
    }

    pub fn id(&self) -> Option<u32> {
        self.handle.id()
    }

    /// Exit code, once the process has been awaited
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Wait for the process to exit and record its exit code
    pub async fn wait(&mut self) -> CommandResult<Option<i32>> {
        let code = self
            .handle
            .wait()
            .await
            .map_err(|e| CommandError::spawn(self.command.executable.clone(), e))?;
        self.exit_code = code;
        Ok(code)
    }

    pub async fn kill(&mut self) -> CommandResult<()> {
        self.handle.kill().await?;
        Ok(())
    }

    /// Give up the wrapper and keep the raw handle
    pub fn into_handle(self) -> Box<dyn ProcessHandle> {
        self.handle
    }
}
