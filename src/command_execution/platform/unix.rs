// Direct invocation on Linux, Android, BSDs and WSL with an explicit app

use crate::command_execution::types::{LaunchRequest, ResolvedCommand, StdioMode};

/// Build a direct invocation of the named app, or of `opener` when no app
/// is named.
///
/// When not waiting, stdio is ignored and the child is detached: `xdg-open`
/// otherwise keeps the caller alive until the opened app exits.
pub fn build(request: &LaunchRequest, opener: &str) -> ResolvedCommand {
    let executable = request.app.as_deref().unwrap_or(opener);
    let mut command = ResolvedCommand::new(executable);

    command.args.extend(request.arguments.iter().cloned());
    if let Some(target) = &request.target {
        command.args.push(target.clone());
    }

    if !request.wait {
        command.options.stdio = StdioMode::Ignore;
        command.options.detached = true;
    }

    command
}
