// macOS `open` command construction

use crate::command_execution::types::{LaunchRequest, ResolvedCommand};

/// The system opener on macOS
pub const OPEN_COMMAND: &str = "open";

/// Build an `open` invocation.
///
/// Order: behaviour flags, `-a <app>`, `--args <arguments...>`, then the
/// target. `open` treats everything after `--args` as the app's own
/// arguments, so the target must come last.
pub fn build(request: &LaunchRequest) -> ResolvedCommand {
    let mut command = ResolvedCommand::new(OPEN_COMMAND);
    let args = &mut command.args;

    if request.wait {
        args.push("--wait-apps".to_string());
    }
    if request.background {
        args.push("--background".to_string());
    }
    if request.new_instance {
        args.push("--new".to_string());
    }
    if let Some(app) = &request.app {
        args.push("-a".to_string());
        args.push(app.clone());
    }
    if !request.arguments.is_empty() {
        args.push("--args".to_string());
        args.extend(request.arguments.iter().cloned());
    }
    if let Some(target) = &request.target {
        args.push(target.clone());
    }

    command
}
