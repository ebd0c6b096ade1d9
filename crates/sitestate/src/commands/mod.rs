//! Command dispatch: bridges CLI args -> core reducers -> output formatting.

pub mod config_cmd;
pub mod replay;
pub mod restore;
pub mod show;
pub mod util;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a state-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Replay(args) => replay::handle(args, ctx),
        Command::Restore(args) => restore::handle(args, ctx),
        Command::Show(args) => show::handle(args, ctx),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
