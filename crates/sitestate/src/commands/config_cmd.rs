//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Handle `config`. Runs even when the config file fails to load, so a
/// broken file can still be located and replaced.
pub fn handle(
    args: ConfigArgs,
    loaded: Result<Config, sitestate_config::ConfigError>,
    output_format: Option<OutputFormat>,
    quiet: bool,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = loaded?;
            let format = output_format.unwrap_or(OutputFormat::Table);
            let out = output::render_single(
                format,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(out.trim_end(), quiet);
            Ok(())
        }

        ConfigCommand::Init { force, snapshot } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = Config {
                snapshot,
                ..Config::default()
            };
            let written = config::save_config(&cfg)?;
            if !quiet {
                eprintln!("Configuration written to {}", written.display());
            }
            Ok(())
        }
    }
}
