//! Shared helpers for command handlers.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use sitestate_core::{
    Dropped, Feature, OwnerId, Persist, RequestStatus, RequestTracker, RestoreReport, RootState,
    SavePhase, SiteSlice,
};
use tabled::Tabled;

use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, Tone};

// ── File I/O ────────────────────────────────────────────────────────

/// Read a whole file, or stdin for `-`.
pub fn read_text(path: &Path) -> Result<String, CliError> {
    let read_err = |source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    };
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(read_err)
}

/// Load a snapshot through the validation gate.
pub fn load_snapshot(path: &Path) -> Result<(RootState, RestoreReport), CliError> {
    let raw: Value =
        serde_json::from_str(&read_text(path)?).map_err(|source| CliError::InvalidJson {
            path: path.display().to_string(),
            source,
        })?;
    let mut report = RestoreReport::default();
    let state = RootState::restore_with(&raw, &mut report);
    tracing::debug!(
        path = %path.display(),
        dropped = report.dropped.len(),
        "snapshot restored"
    );
    Ok((state, report))
}

/// Write the persisted form of `state` as pretty JSON.
pub fn save_snapshot(state: &RootState, path: &Path) -> Result<(), CliError> {
    let snapshot = state.snapshot()?;
    let text = serde_json::to_string_pretty(&snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::WriteFile {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, text + "\n").map_err(|source| CliError::WriteFile {
        path: path.display().to_string(),
        source,
    })
}

/// Tell the user about dropped entries on stderr.
pub fn warn_dropped(report: &RestoreReport, ctx: &Context) {
    if ctx.quiet || report.is_clean() {
        return;
    }
    for Dropped { path, reason } in &report.dropped {
        eprintln!(
            "{} {path}: {reason}",
            output::paint("dropped", Tone::Bad, ctx.color)
        );
    }
}

// ── State summary ───────────────────────────────────────────────────

/// One row per feature and site, across every sub-store.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SiteRow {
    #[tabled(rename = "Feature")]
    pub feature: &'static str,
    #[tabled(rename = "Site")]
    pub site: String,
    #[tabled(rename = "Items")]
    pub items: usize,
    #[tabled(rename = "Requesting")]
    pub requesting: String,
    #[tabled(rename = "Saving")]
    pub saving: String,
    #[tabled(rename = "Restoring")]
    pub restoring: String,
}

/// Summary rows for the whole state.
pub fn summary_rows(state: &RootState, color: bool) -> Vec<SiteRow> {
    let mut rows = slice_rows(&state.zoninator, None, color);
    rows.extend(slice_rows(
        &state.super_cache.slice,
        Some(&state.super_cache.restoring),
        color,
    ));
    rows
}

fn slice_rows<F: Feature>(
    slice: &SiteSlice<F>,
    restoring: Option<&RequestTracker>,
    color: bool,
) -> Vec<SiteRow> {
    let mut sites: BTreeSet<&OwnerId> = slice.items.owners().map(|(site, _)| site).collect();
    sites.extend(slice.requesting.owners().map(|(site, _)| site));
    sites.extend(slice.saving.owners().map(|(site, _)| site));
    if let Some(tracker) = restoring {
        sites.extend(tracker.owners().map(|(site, _)| site));
    }

    sites
        .into_iter()
        .map(|site| SiteRow {
            feature: F::NAME,
            site: site.to_string(),
            items: slice.items.owner(site).map_or(0, |items| items.len()),
            requesting: request_cell(slice.requesting.status(site), color),
            saving: slice.saving.status(site).map_or_else(
                || output::paint("-", Tone::Muted, color),
                |status| {
                    let tone = match status.phase() {
                        SavePhase::Pending => Tone::Busy,
                        SavePhase::Success => Tone::Good,
                        SavePhase::Error => Tone::Bad,
                    };
                    output::paint(&status.phase().to_string(), tone, color)
                },
            ),
            restoring: restoring.map_or_else(
                || output::paint("-", Tone::Muted, color),
                |tracker| request_cell(tracker.status(site), color),
            ),
        })
        .collect()
}

fn request_cell(status: RequestStatus, color: bool) -> String {
    let tone = match status {
        RequestStatus::NotRequested => Tone::Muted,
        RequestStatus::InFlight => Tone::Busy,
        RequestStatus::Settled => Tone::Good,
    };
    output::paint(&status.to_string(), tone, color)
}

/// Table view of the whole state, or a placeholder when it's empty.
pub fn summary_table(state: &RootState, color: bool) -> String {
    let rows = summary_rows(state, color);
    if rows.is_empty() {
        return output::paint("(empty state)", Tone::Muted, color);
    }
    output::render_table(&rows)
}
