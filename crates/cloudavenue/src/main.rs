mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudavenue_config::Settings;
use cloudavenue_core::Client;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = load_settings(&cli.global);
    let debug = settings.as_ref().is_ok_and(|s| s.debug);
    init_tracing(cli.global.verbose, debug);

    let result = match settings {
        Ok(settings) => run(cli, settings).await,
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, debug: bool) {
    let filter = match (verbosity, debug) {
        (0, false) => "warn",
        (0 | 1, true) | (2, _) => "debug",
        (1, false) => "info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Settings from the config file and environment, with global flags on top.
fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = match &global.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(org) = &global.org {
        settings.org = Some(org.clone());
    }
    if let Some(vdc) = &global.vdc {
        settings.vdc = Some(vdc.clone());
    }
    if let Some(endpoint) = &global.endpoint {
        settings.endpoint = Some(endpoint.clone());
    }
    if global.insecure {
        settings.insecure = true;
    }
    Ok(settings)
}

async fn run(cli: Cli, settings: Settings) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a console connection
        Command::Config(args) => commands::config_cmd::handle(args, &settings, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cav", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client = Client::new(settings.to_client_config()?)?;
            tracing::debug!(command = ?cmd, org = client.organization(), "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}
