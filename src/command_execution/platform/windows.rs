// Windows `Start-Process` invocation through an encoded PowerShell command

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::command_execution::types::{LaunchRequest, ResolvedCommand};

/// Fallback when neither `SYSTEMROOT` nor `windir` is set
const DEFAULT_SYSTEM_ROOT: &str = "C:\\Windows";

/// PowerShell flags for a non-interactive run of an encoded command
const POWERSHELL_FLAGS: [&str; 5] = [
    "-NoProfile",
    "-NonInteractive",
    "-ExecutionPolicy",
    "Bypass",
    "-EncodedCommand",
];

/// PowerShell reached through the WSL drive mount point
pub fn wsl_powershell_path(mount_point: &str) -> String {
    format!(
        "{}c/Windows/System32/WindowsPowerShell/v1.0/powershell.exe",
        mount_point
    )
}

/// PowerShell under the native system root
pub fn native_powershell_path(system_root: Option<&str>) -> String {
    format!(
        "{}\\System32\\WindowsPowerShell\\v1.0\\powershell",
        system_root.unwrap_or(DEFAULT_SYSTEM_ROOT)
    )
}

/// Quote a value so it survives two rounds of parsing.
///
/// The outer `"` pair groups the value for the PowerShell parser, and the
/// backtick-escaped inner pair (`` `" ``) is passed through literally so
/// `Start-Process` hands the program a quoted argument. Embedded `"` and
/// backticks in `value` are not escaped.
pub fn quote_for_nested_shell(value: &str) -> String {
    format!("\"`\"{}`\"\"", value)
}

/// UTF-16LE then Base64, the format `-EncodedCommand` expects
pub fn encode_powershell_command(script: &str) -> String {
    let bytes: Vec<u8> = script
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect();
    STANDARD.encode(bytes)
}

/// The `Start ...` script before encoding
pub fn start_process_script(request: &LaunchRequest) -> String {
    let mut parts = vec!["Start".to_string()];
    let mut app_arguments = request.arguments.clone();

    if request.wait {
        parts.push("-Wait".to_string());
    }

    match (&request.app, &request.target) {
        (Some(app), target) => {
            parts.push(quote_for_nested_shell(app));
            // With an app, the target is just another argument to it
            if let Some(target) = target {
                app_arguments.push(target.clone());
            }
        }
        (None, Some(target)) => parts.push(format!("\"{}\"", target)),
        (None, None) => {}
    }

    if !app_arguments.is_empty() {
        let quoted: Vec<String> = app_arguments
            .iter()
            .map(|argument| quote_for_nested_shell(argument))
            .collect();
        parts.push("-ArgumentList".to_string());
        parts.push(quoted.join(","));
    }

    parts.join(" ")
}

/// Build the PowerShell command line.
///
/// `verbatim` is set when PowerShell is started directly on Windows, where
/// the quoting above must reach it untouched; WSL re-parses the arguments
/// itself.
pub fn build(request: &LaunchRequest, powershell: String, verbatim: bool) -> ResolvedCommand {
    let mut command = ResolvedCommand::new(powershell);
    command.args = POWERSHELL_FLAGS.iter().map(|flag| flag.to_string()).collect();
    command
        .args
        .push(encode_powershell_command(&start_process_script(request)));
    command.options.verbatim_arguments = verbatim;
    command
}
