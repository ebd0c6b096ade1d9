//! `restore`: run a snapshot through the gate and report what survived.

use serde::Serialize;
use serde_json::Value;
use sitestate_core::{Dropped, Persist};
use tabled::Tabled;

use crate::cli::RestoreArgs;
use crate::config::{Context, config_path};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

#[derive(Debug, Serialize)]
struct RestoreOutcome {
    snapshot: Value,
    dropped: Vec<Dropped>,
}

#[derive(Tabled)]
struct DroppedRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn handle(args: RestoreArgs, ctx: &Context) -> Result<(), CliError> {
    let path = ctx
        .snapshot_path(args.snapshot)
        .ok_or_else(|| CliError::NoSnapshot {
            config_path: config_path().display().to_string(),
        })?;

    let (state, report) = util::load_snapshot(&path)?;
    if args.strict && !report.is_clean() {
        util::warn_dropped(&report, ctx);
        return Err(CliError::DroppedEntries {
            count: report.dropped.len(),
        });
    }

    let outcome = RestoreOutcome {
        snapshot: state.snapshot()?,
        dropped: report.dropped,
    };
    let out = output::render_single(
        ctx.output,
        &outcome,
        |o| {
            let mut text = util::summary_table(&state, ctx.color);
            text.push('\n');
            if o.dropped.is_empty() {
                text.push_str(&output::paint("No entries dropped", Tone::Good, ctx.color));
            } else {
                let rows: Vec<DroppedRow> = o
                    .dropped
                    .iter()
                    .map(|d| DroppedRow {
                        path: output::paint(&d.path, Tone::Bad, ctx.color),
                        reason: d.reason.to_string(),
                    })
                    .collect();
                text.push_str(&output::render_table(&rows));
            }
            text
        },
        |o| {
            o.dropped
                .iter()
                .map(|d| d.path.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
