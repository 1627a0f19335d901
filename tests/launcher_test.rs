// Integration tests for open request dispatch

mod support;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use openwith::command_execution::StdioMode;
use openwith::platform::OperatingSystem;
use openwith::{ApplicationName, ApplicationSpec, CommandError, LauncherConfig, OpenOptions};

use support::{FakeBrowser, FakeEnv, Harness, Outcome, RecordingSpawner};

fn decode_powershell(encoded: &str) -> String {
    let bytes = STANDARD.decode(encoded).unwrap();
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap()
}

#[tokio::test]
async fn test_candidates_tried_in_order_until_last_succeeds() {
    let spawner = RecordingSpawner::new()
        .outcome("google-chrome", Outcome::NotFound)
        .outcome("google-chrome-stable", Outcome::NotFound);
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let app = ApplicationSpec::new(vec!["google-chrome", "google-chrome-stable", "chromium"]);
    let process = h
        .launcher
        .open("https://example.com", OpenOptions::new().with_app(app))
        .await
        .unwrap();

    assert_eq!(process.command().executable, "chromium");
    assert_eq!(
        h.spawner.executables(),
        vec!["google-chrome", "google-chrome-stable", "chromium"]
    );
}

#[tokio::test]
async fn test_all_candidates_fail_with_last_error() {
    let spawner = RecordingSpawner::new()
        .outcome("first", Outcome::NotFound)
        .outcome("second", Outcome::NotFound);
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let specs = vec![ApplicationSpec::new("first"), ApplicationSpec::new("second")];
    let err = h
        .launcher
        .open("a.txt", OpenOptions::new().with_app(specs))
        .await
        .unwrap_err();

    match err {
        CommandError::Spawn { command, .. } => assert_eq!(command, "second"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.spawner.executables(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_nested_alternatives_and_first_success_short_circuits() {
    let spawner = RecordingSpawner::new().outcome("a1", Outcome::NotFound);
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let specs = vec![
        ApplicationSpec::new(vec!["a1", "a2"]).arg("--x"),
        ApplicationSpec::new("b"),
    ];
    let process = h
        .launcher
        .open("a.txt", OpenOptions::new().with_app(specs))
        .await
        .unwrap();

    assert_eq!(process.command().args, vec!["--x", "a.txt"]);
    assert_eq!(h.spawner.executables(), vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_non_string_target_is_rejected_before_spawn() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), RecordingSpawner::new());

    for target in [json!(42), json!(null), json!(["a"]), json!({"path": "a"})] {
        let err = h.launcher.open_value(&target, &json!({})).await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }
    assert!(h.spawner.commands().is_empty());
}

#[tokio::test]
async fn test_open_app_rejects_non_list_arguments() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), RecordingSpawner::new());

    let err = h
        .launcher
        .open_app_value(&json!("gedit"), &json!({"arguments": "not-a-list"}))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidArgument(ref m) if m.contains("Array")));

    let err = h
        .launcher
        .open_app_value(&json!(7), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidArgument(_)));
    assert!(h.spawner.commands().is_empty());
}

#[tokio::test]
async fn test_open_app_value_passes_arguments() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), RecordingSpawner::new());

    h.launcher
        .open_app_value(&json!(["gedit"]), &json!({"arguments": ["--new-window"], "wait": true}))
        .await
        .unwrap();

    let command = h.spawner.last();
    assert_eq!(command.executable, "gedit");
    assert_eq!(command.args, vec!["--new-window"]);
    assert_eq!(h.spawner.wait_count(), 1);
}

#[tokio::test]
async fn test_macos_textedit_background() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::MacOS), RecordingSpawner::new());

    let options = OpenOptions::new()
        .with_app("TextEdit")
        .with_wait(true)
        .with_background(true);
    h.launcher.open("/tmp/a.txt", options).await.unwrap();

    let command = h.spawner.last();
    assert_eq!(command.executable, "open");
    assert_eq!(command.value_of("-a"), Some("TextEdit"));
    assert!(command.position("--background").is_some());
    assert_eq!(command.args.last().map(String::as_str), Some("/tmp/a.txt"));
}

#[tokio::test]
async fn test_windows_url_without_app() {
    let env = FakeEnv::new(OperatingSystem::Windows).with_var("SYSTEMROOT", "C:\\WINDOWS");
    let h = Harness::new(env, RecordingSpawner::new());

    h.launcher
        .open("https://example.com", OpenOptions::new())
        .await
        .unwrap();

    let command = h.spawner.last();
    assert_eq!(
        command.executable,
        "C:\\WINDOWS\\System32\\WindowsPowerShell\\v1.0\\powershell"
    );
    assert!(command.options.verbatim_arguments);

    let script = decode_powershell(command.value_of("-EncodedCommand").unwrap());
    assert!(script.starts_with("Start"));
    assert!(script.contains("\"https://example.com\""));
    assert!(!script.contains("-ArgumentList"));
}

#[tokio::test]
async fn test_windows_system_root_falls_back_to_windir() {
    let env = FakeEnv::new(OperatingSystem::Windows).with_var("windir", "E:\\Win");
    let h = Harness::new(env, RecordingSpawner::new());

    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert!(h.spawner.last().executable.starts_with("E:\\Win\\System32"));
}

#[tokio::test]
async fn test_wsl_mount_point_read_once() {
    let env = FakeEnv::wsl().with_file("/etc/wsl.conf", "[automount]\nroot = /win\n");
    let h = Harness::new(env, RecordingSpawner::new());

    h.launcher.open("https://a.example", OpenOptions::new()).await.unwrap();
    h.launcher.open("https://b.example", OpenOptions::new()).await.unwrap();

    assert_eq!(h.env.read_count(), 1);
    assert_eq!(h.launcher.wsl_mount_point(), Some("/win/"));
    for command in h.spawner.commands() {
        assert_eq!(
            command.executable,
            "/win/c/Windows/System32/WindowsPowerShell/v1.0/powershell.exe"
        );
        assert!(!command.options.verbatim_arguments);
    }
}

#[tokio::test]
async fn test_wsl_missing_config_uses_default_without_caching() {
    let h = Harness::new(FakeEnv::wsl(), RecordingSpawner::new());

    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    h.launcher.open("b.txt", OpenOptions::new()).await.unwrap();

    assert_eq!(h.env.read_count(), 2);
    assert_eq!(h.launcher.wsl_mount_point(), None);
    assert!(h.spawner.last().executable.starts_with("/mnt/c/Windows"));
}

#[tokio::test]
async fn test_wsl_with_app_or_container_runs_directly() {
    let h = Harness::new(FakeEnv::wsl(), RecordingSpawner::new());
    h.launcher
        .open("a.txt", OpenOptions::new().with_app("code"))
        .await
        .unwrap();
    assert_eq!(h.spawner.last().executable, "code");

    let mut env = FakeEnv::wsl();
    env.container = true;
    let h = Harness::new(env, RecordingSpawner::new());
    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert_eq!(h.spawner.last().executable, "xdg-open");
    assert_eq!(h.env.read_count(), 0);
}

#[tokio::test]
async fn test_browser_private_with_firefox() {
    let h = Harness::with_browser(
        FakeEnv::new(OperatingSystem::Linux),
        RecordingSpawner::new(),
        FakeBrowser::new("org.mozilla.firefox", "Firefox"),
    );

    h.launcher
        .open(
            "https://example.com",
            OpenOptions::new().with_app("browserPrivate"),
        )
        .await
        .unwrap();

    let command = h.spawner.last();
    assert_eq!(command.executable, "firefox");
    assert_eq!(command.args, vec!["--private-window", "https://example.com"]);
}

#[tokio::test]
async fn test_browser_alias_expands_table_candidates() {
    let spawner = RecordingSpawner::new().outcome("google-chrome", Outcome::NotFound);
    let h = Harness::with_browser(
        FakeEnv::new(OperatingSystem::Linux),
        spawner,
        FakeBrowser::new("google-chrome.desktop", "Google Chrome"),
    );

    h.launcher
        .open("https://example.com", OpenOptions::new().with_app("browser"))
        .await
        .unwrap();

    assert_eq!(h.spawner.executables(), vec!["google-chrome", "google-chrome-stable"]);
    assert!(h.spawner.last().position("--incognito").is_none());
}

#[tokio::test]
async fn test_browser_alias_on_windows_is_quoted_in_script() {
    let h = Harness::with_browser(
        FakeEnv::new(OperatingSystem::Windows),
        RecordingSpawner::new(),
        FakeBrowser::new("com.microsoft.edge", "Edge"),
    );

    h.launcher
        .open(
            "https://example.com",
            OpenOptions::new().with_app("browserPrivate"),
        )
        .await
        .unwrap();

    let script = decode_powershell(h.spawner.last().value_of("-EncodedCommand").unwrap());
    assert_eq!(
        script,
        "Start \"`\"msedge`\"\" -ArgumentList \"`\"--inPrivate`\"\",\"`\"https://example.com`\"\""
    );
}

#[tokio::test]
async fn test_unsupported_browser_fails_before_spawn() {
    let h = Harness::with_browser(
        FakeEnv::new(OperatingSystem::MacOS),
        RecordingSpawner::new(),
        FakeBrowser::new("com.apple.Safari", "Safari"),
    );

    let err = h
        .launcher
        .open("https://example.com", OpenOptions::new().with_app("browser"))
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::UnsupportedBrowser(ref name) if name == "Safari"));
    assert!(h.spawner.commands().is_empty());
}

#[tokio::test]
async fn test_unsupported_platform_fails_before_spawn() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Android), RecordingSpawner::new());

    let err = h
        .launcher
        .open("https://example.com", OpenOptions::new().with_app("browser"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "android is not supported");
    assert!(h.spawner.commands().is_empty());
}

#[tokio::test]
async fn test_wait_rejects_nonzero_exit() {
    let spawner = RecordingSpawner::new().outcome("failing", Outcome::Exit(2));
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let err = h
        .launcher
        .open("a.txt", OpenOptions::new().with_app("failing").with_wait(true))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), Some(2));

    let process = h
        .launcher
        .open(
            "a.txt",
            OpenOptions::new()
                .with_app("failing")
                .with_wait(true)
                .with_allow_nonzero_exit_code(true),
        )
        .await
        .unwrap();
    assert_eq!(process.exit_code(), Some(2));
}

#[tokio::test]
async fn test_wait_accepts_signal_termination() {
    let spawner = RecordingSpawner::new().outcome("killed", Outcome::Signal);
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let process = h
        .launcher
        .open("a.txt", OpenOptions::new().with_app("killed").with_wait(true))
        .await
        .unwrap();
    assert_eq!(process.exit_code(), None);
}

#[tokio::test]
async fn test_no_wait_returns_detached_handle_without_waiting() {
    let spawner = RecordingSpawner::new().outcome("xdg-open", Outcome::Exit(4));
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), spawner);

    let process = h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();

    assert_eq!(h.spawner.wait_count(), 0);
    assert_eq!(process.id(), Some(4242));
    assert!(process.command().options.detached);
    assert_eq!(process.command().options.stdio, StdioMode::Ignore);
}

#[tokio::test]
async fn test_bundled_opener_selection() {
    let env = FakeEnv::new(OperatingSystem::Linux).with_executable("/opt/app/xdg-open");
    let config = LauncherConfig {
        local_opener_path: Some("/opt/app/xdg-open".into()),
        ..LauncherConfig::default()
    };
    let h = Harness::with_config(
        env,
        RecordingSpawner::new(),
        FakeBrowser::new("firefox.desktop", "Firefox"),
        config.clone(),
    );
    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert_eq!(h.spawner.last().executable, "/opt/app/xdg-open");

    // Same host, but the runtime asks for the system opener
    let env = FakeEnv::new(OperatingSystem::Linux).with_executable("/opt/app/xdg-open");
    let h = Harness::with_config(
        env,
        RecordingSpawner::new(),
        FakeBrowser::new("firefox.desktop", "Firefox"),
        LauncherConfig {
            prefer_system_opener: true,
            ..config.clone()
        },
    );
    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert_eq!(h.spawner.last().executable, "xdg-open");

    // Android never uses the bundled opener
    let env = FakeEnv::new(OperatingSystem::Android).with_executable("/opt/app/xdg-open");
    let h = Harness::with_config(
        env,
        RecordingSpawner::new(),
        FakeBrowser::new("firefox.desktop", "Firefox"),
        config,
    );
    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert_eq!(h.spawner.last().executable, "xdg-open");
}

#[tokio::test]
async fn test_bundled_opener_not_executable_falls_back() {
    let config = LauncherConfig {
        local_opener_path: Some("/opt/app/xdg-open".into()),
        ..LauncherConfig::default()
    };
    let h = Harness::with_config(
        FakeEnv::new(OperatingSystem::Linux),
        RecordingSpawner::new(),
        FakeBrowser::new("firefox.desktop", "Firefox"),
        config,
    );

    h.launcher.open("a.txt", OpenOptions::new()).await.unwrap();
    assert_eq!(h.spawner.last().executable, "xdg-open");
}

#[tokio::test]
async fn test_open_app_without_target() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::MacOS), RecordingSpawner::new());

    h.launcher
        .open_app(
            ApplicationSpec::new("Xcode").arg("--reset"),
            OpenOptions::new().with_new_instance(true),
        )
        .await
        .unwrap();

    assert_eq!(h.spawner.last().args, vec!["--new", "-a", "Xcode", "--args", "--reset"]);
}

#[tokio::test]
async fn test_empty_target_or_name_opens_bare_opener() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), RecordingSpawner::new());

    h.launcher.open("", OpenOptions::new()).await.unwrap();
    let command = h.spawner.last();
    assert_eq!(command.executable, "xdg-open");
    assert!(command.args.is_empty());

    h.launcher.open_value(&json!(""), &json!({})).await.unwrap();
    h.launcher.open_app_value(&json!(""), &json!({})).await.unwrap();
    assert_eq!(h.spawner.executables(), vec!["xdg-open", "xdg-open", "xdg-open"]);
    assert!(h.spawner.commands().iter().all(|command| command.args.is_empty()));
}

#[tokio::test]
async fn test_empty_target_on_macos_has_no_trailing_argument() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::MacOS), RecordingSpawner::new());

    h.launcher
        .open("", OpenOptions::new().with_app("Safari"))
        .await
        .unwrap();
    assert_eq!(h.spawner.last().args, vec!["-a", "Safari"]);
}

#[tokio::test]
async fn test_empty_candidate_list_is_invalid() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Linux), RecordingSpawner::new());

    assert!(matches!(
        h.launcher
            .open_app(ApplicationName::Alternatives(Vec::new()), OpenOptions::new())
            .await,
        Err(CommandError::InvalidArgument(_))
    ));
    assert!(matches!(
        h.launcher
            .open("a.txt", OpenOptions::new().with_app(Vec::<ApplicationSpec>::new()))
            .await,
        Err(CommandError::InvalidArgument(_))
    ));
    assert!(h.spawner.commands().is_empty());
}

#[tokio::test]
async fn test_apps_view_uses_launcher_environment() {
    let h = Harness::new(FakeEnv::new(OperatingSystem::Windows), RecordingSpawner::new());

    assert_eq!(h.launcher.apps().chrome().unwrap(), ApplicationName::from("chrome"));
    assert_eq!(h.launcher.apps().edge().unwrap(), ApplicationName::from("msedge"));
}
