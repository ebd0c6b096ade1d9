//! CLI configuration: a thin wrapper around `sitestate_config` shared types.
//!
//! Re-exports the shared types and resolves the effective settings for
//! one invocation: flags first, then the config file, then defaults.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sitestate_config::{
    Config, LogConfig, LogFormat, config_path, load_config, save_config,
};

// ── Resolved invocation settings ────────────────────────────────────

/// Everything a command handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub config: Config,
}

impl Context {
    pub fn resolve(global: &GlobalOpts, config: Config) -> Result<Self, CliError> {
        let output = match global.output {
            Some(format) => format,
            None => parse_value::<OutputFormat>("defaults.output", &config.defaults.output)?,
        };
        let color = match global.color {
            Some(mode) => mode,
            None => parse_value::<ColorMode>("defaults.color", &config.defaults.color)?,
        };

        Ok(Self {
            output,
            color: output::should_color(color),
            quiet: global.quiet,
            config,
        })
    }

    /// The snapshot to use: the explicit one, else the configured default.
    pub fn snapshot_path(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.config.snapshot.clone())
    }
}

fn parse_value<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}
