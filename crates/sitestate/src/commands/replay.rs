//! `replay`: restore, dispatch a batch of actions, print the result.

use serde::Serialize;
use sitestate_core::{RootState, Store, parse_actions};

use crate::cli::ReplayArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

/// What `replay` prints in structured formats.
#[derive(Debug, Serialize)]
struct ReplayOutcome<'a> {
    applied: usize,
    unrecognized: Vec<String>,
    state: &'a RootState,
}

pub fn handle(args: ReplayArgs, ctx: &Context) -> Result<(), CliError> {
    let initial = match ctx.snapshot_path(args.snapshot.clone()) {
        // an explicit --snapshot must exist; a configured one may not yet
        Some(path) if args.snapshot.is_some() || path.exists() => {
            let (state, report) = util::load_snapshot(&path)?;
            util::warn_dropped(&report, ctx);
            state
        }
        Some(path) => {
            tracing::debug!(path = %path.display(), "configured snapshot absent, starting empty");
            RootState::default()
        }
        None => RootState::default(),
    };

    let text = util::read_text(&args.actions)?;
    let actions = parse_actions(&text).map_err(|source| CliError::InvalidActions {
        path: args.actions.display().to_string(),
        source,
    })?;

    let unrecognized: Vec<String> = actions
        .iter()
        .filter(|action| !action.is_recognized())
        .map(|action| action.kind().unwrap_or_else(|| "(untyped)".into()))
        .collect();

    let store = Store::new(initial);
    let applied = store.dispatch_all(actions);
    let state = store.state();
    tracing::info!(applied, unrecognized = unrecognized.len(), "replay finished");

    if let Some(ref path) = args.save {
        util::save_snapshot(&state, path)?;
        if !ctx.quiet {
            eprintln!("Snapshot written to {}", path.display());
        }
    }

    let outcome = ReplayOutcome {
        applied,
        unrecognized,
        state: &state,
    };
    let out = output::render_single(
        ctx.output,
        &outcome,
        |o| {
            let mut text = util::summary_table(o.state, ctx.color);
            text.push_str(&format!("\n{} actions applied", o.applied));
            if !o.unrecognized.is_empty() {
                text.push_str(&format!(
                    ", {} ignored ({})",
                    o.unrecognized.len(),
                    o.unrecognized.join(", ")
                ));
            }
            text
        },
        |o| {
            util::summary_rows(o.state, false)
                .into_iter()
                .map(|row| format!("{}\t{}", row.feature, row.site))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
