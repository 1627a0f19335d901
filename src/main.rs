use anyhow::{Context, Result, bail};
use clap::Parser;

use openwith::{AppChoice, ApplicationName, ApplicationSpec, CommandError, OpenOptions};

/// Open a file, URL or application
#[derive(Debug, Parser)]
#[command(name = "openwith", version, about)]
struct Cli {
    /// File, URL or identifier to open
    target: Option<String>,

    /// Application to use; repeat to give alternatives tried in order
    #[arg(short, long = "app", value_name = "NAME")]
    apps: Vec<String>,

    /// Wait for the opened app to exit
    #[arg(short, long)]
    wait: bool,

    /// macOS: do not bring the app to the foreground
    #[arg(short, long)]
    background: bool,

    /// macOS: open a new instance of the app
    #[arg(short, long)]
    new_instance: bool,

    /// With --wait, succeed even if the app exits with a nonzero code
    #[arg(long)]
    allow_nonzero_exit_code: bool,

    /// Enable debug logging
    #[arg(short, long, env = "OPENWITH_VERBOSE")]
    verbose: bool,

    /// Arguments passed to the application
    #[arg(last = true, value_name = "APP_ARGS")]
    app_arguments: Vec<String>,
}

impl Cli {
    fn app_spec(&self) -> Option<ApplicationSpec> {
        let name = match self.apps.as_slice() {
            [] => return None,
            [single] => ApplicationName::Single(single.clone()),
            many => ApplicationName::Alternatives(many.to_vec()),
        };
        Some(ApplicationSpec::new(name).with_arguments(self.app_arguments.clone()))
    }

    fn options(&self) -> OpenOptions {
        OpenOptions::new()
            .with_wait(self.wait)
            .with_background(self.background)
            .with_new_instance(self.new_instance)
            .with_allow_nonzero_exit_code(self.allow_nonzero_exit_code)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let launcher = openwith::default_launcher();
    let options = cli.options();

    let result = match (&cli.target, cli.app_spec()) {
        (Some(target), app) => {
            let options = match app {
                Some(spec) => options.with_app(AppChoice::Single(spec)),
                None => options,
            };
            launcher.open(target.clone(), options).await
        }
        (None, Some(spec)) => launcher.open_app(spec, options).await,
        (None, None) => bail!("nothing to open: pass a TARGET or --app"),
    };

    match result {
        Ok(process) => {
            log::debug!("Started {}", process.command());
            Ok(())
        }
        Err(CommandError::NonZeroExit { code }) => std::process::exit(code),
        Err(e) => Err(e).context("failed to open"),
    }
}
