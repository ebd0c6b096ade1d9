//! `show`: per-site tables of the items held in a snapshot.

use serde::Serialize;
use serde_json::Value;
use sitestate_core::{EntityId, OwnerId, RootState, Zone};
use tabled::Tabled;

use crate::cli::{FeatureFilter, ShowArgs};
use crate::config::{Context, config_path};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ZoneEntry<'a> {
    site: &'a OwnerId,
    id: &'a EntityId,
    zone: &'a Zone,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ZoneEntry<'_>> for ZoneRow {
    fn from(entry: &ZoneEntry<'_>) -> Self {
        Self {
            site: entry.site.to_string(),
            id: entry.id.to_string(),
            name: entry.zone.name().unwrap_or_default().to_owned(),
            slug: entry.zone.slug().unwrap_or_default().to_owned(),
            description: entry.zone.description().unwrap_or_default().to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SettingEntry<'a> {
    site: &'a OwnerId,
    setting: &'a str,
    value: &'a Value,
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Setting")]
    setting: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&SettingEntry<'_>> for SettingRow {
    fn from(entry: &SettingEntry<'_>) -> Self {
        Self {
            site: entry.site.to_string(),
            setting: entry.setting.to_owned(),
            value: match entry.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

// ── Collectors ──────────────────────────────────────────────────────

fn zone_entries(state: &RootState) -> Vec<ZoneEntry<'_>> {
    state
        .zoninator
        .items
        .owners()
        .flat_map(|(site, zones)| zones.iter().map(move |(id, zone)| ZoneEntry { site, id, zone }))
        .collect()
}

fn setting_entries(state: &RootState) -> Vec<SettingEntry<'_>> {
    state
        .super_cache
        .slice
        .items
        .owners()
        .flat_map(|(site, bundle)| {
            bundle.iter().map(move |(setting, value)| SettingEntry {
                site,
                setting,
                value,
            })
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ShowArgs, ctx: &Context) -> Result<(), CliError> {
    let path = ctx
        .snapshot_path(args.snapshot)
        .ok_or_else(|| CliError::NoSnapshot {
            config_path: config_path().display().to_string(),
        })?;
    let (state, report) = util::load_snapshot(&path)?;
    util::warn_dropped(&report, ctx);

    let out = match args.feature {
        Some(FeatureFilter::Zones) => output::render_list(
            ctx.output,
            &zone_entries(&state),
            |e| ZoneRow::from(e),
            |e| format!("{}\t{}", e.site, e.id),
        )?,
        Some(FeatureFilter::Cache) => output::render_list(
            ctx.output,
            &setting_entries(&state),
            |e| SettingRow::from(e),
            |e| format!("{}\t{}", e.site, e.setting),
        )?,
        None => {
            let rows = util::summary_rows(&state, ctx.color);
            output::render_list(ctx.output, &rows, util::SiteRow::clone, |r| {
                format!("{}\t{}", r.feature, r.site)
            })?
        }
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}
