mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::{Config, Context, LogConfig, LogFormat};
use crate::error::CliError;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Config errors surface from `run`; logging falls back to defaults.
    let loaded = config::load_config();
    let log = loaded
        .as_ref()
        .map(|cfg| cfg.log.clone())
        .unwrap_or_default();
    init_tracing(cli.global.verbose, &log);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, loaded) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, log: &LogConfig) {
    let filter = match verbosity {
        0 => log.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // stdout carries command output; logs go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match log.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli, loaded: Result<Config, sitestate_config::ConfigError>) -> Result<(), CliError> {
    match cli.command {
        // Config commands work without (or despite) a config file
        Command::Config(args) => {
            commands::config_cmd::handle(args, loaded, cli.global.output, cli.global.quiet)
        }

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sitestate", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs resolved settings
        cmd => {
            let ctx = Context::resolve(&cli.global, loaded?)?;
            tracing::debug!(command = ?cmd, output = ?ctx.output, "dispatching command");
            commands::dispatch(cmd, &ctx)
        }
    }
}
