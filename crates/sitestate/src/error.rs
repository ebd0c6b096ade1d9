//! CLI error types with miette diagnostics.
//!
//! Wraps core and config failures into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sitestate_config::ConfigError;
use sitestate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const DROPPED: i32 = 5;
    pub const CONFIG: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input files ──────────────────────────────────────────────────

    #[error("Could not read {path}")]
    #[diagnostic(code(sitestate::read_file))]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}")]
    #[diagnostic(code(sitestate::write_file))]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON")]
    #[diagnostic(
        code(sitestate::invalid_json),
        help("Snapshots are a single JSON object, e.g. {{\"zoninator\":{{\"items\":{{}}}}}}")
    )]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not parse actions from {path}")]
    #[diagnostic(
        code(sitestate::invalid_actions),
        help(
            "Provide a JSON array of actions, or one JSON object per line.\n\
             Each action carries a \"type\" tag, e.g. {{\"type\":\"ZONINATOR_REQUEST_ZONES\",\"siteId\":1}}"
        )
    )]
    InvalidActions {
        path: String,
        #[source]
        source: CoreError,
    },

    #[error("No snapshot given")]
    #[diagnostic(
        code(sitestate::no_snapshot),
        help(
            "Pass a snapshot path, or set `snapshot` in the config file.\n\
             Config file: {config_path}"
        )
    )]
    NoSnapshot { config_path: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Dropped invalid snapshot entries: {count}")]
    #[diagnostic(
        code(sitestate::dropped_entries),
        help("Run without --strict to see the restored state and every dropped path.")
    )]
    DroppedEntries { count: usize },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitestate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(sitestate::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(sitestate::config),
        help("Check the config file (sitestate config path) and SITESTATE_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── State / Serialization ────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(sitestate::core))]
    Core(#[from] CoreError),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(sitestate::render))]
    Render(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReadFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                exit_code::NOT_FOUND
            }
            Self::InvalidJson { .. } | Self::InvalidActions { .. } => exit_code::INVALID_INPUT,
            Self::NoSnapshot { .. } | Self::Validation { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            Self::DroppedEntries { .. } => exit_code::DROPPED,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}
