// ── Persistence gate ──
//
// Saving is the identity: the in-memory shape already is the storage
// shape. Loading is a filter: owner entries that aren't JSON objects,
// or that don't deserialize into the entity map, are dropped whole.
// Nothing here ever fails on bad input.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::OwnerId;
use crate::reducer::Feature;
use crate::store::{EntityMap, KeyedItems, SiteSlice};

/// Why a snapshot entry was left out of the restored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The value is a primitive, an array, or null.
    NotAnObject { found: &'static str },
    /// The value is an object but doesn't match the entity shape.
    Malformed { message: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { found } => write!(f, "expected an object, found {found}"),
            Self::Malformed { message } => write!(f, "malformed entry: {message}"),
        }
    }
}

/// One entry the gate refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropped {
    /// Dotted location inside the snapshot, e.g. `zoninator.items.123456`.
    pub path: String,
    pub reason: DropReason,
}

/// Everything the gate dropped while restoring one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub dropped: Vec<Dropped>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    fn drop_entry(&mut self, path: String, reason: DropReason) {
        tracing::warn!(%path, %reason, "dropping invalid persisted entry");
        self.dropped.push(Dropped { path, reason });
    }
}

/// Two-way mapping between in-memory state and its persisted snapshot.
pub trait Persist: Sized {
    fn snapshot(&self) -> Result<Value, CoreError>;

    /// Restore from `candidate`, recording every dropped entry under
    /// `path` in `report`.
    fn restore_at(candidate: &Value, path: &str, report: &mut RestoreReport) -> Self;

    fn restore_with(candidate: &Value, report: &mut RestoreReport) -> Self {
        Self::restore_at(candidate, "", report)
    }

    fn restore(candidate: &Value) -> Self {
        Self::restore_with(candidate, &mut RestoreReport::default())
    }
}

/// Join two path segments with a dot, skipping an empty prefix.
pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// The candidate as an object, or `None` (recorded) if it isn't one.
pub(crate) fn expect_object<'a>(
    candidate: &'a Value,
    path: &str,
    report: &mut RestoreReport,
) -> Option<&'a Map<String, Value>> {
    match candidate {
        Value::Object(map) => Some(map),
        other => {
            report.drop_entry(
                path.to_owned(),
                DropReason::NotAnObject {
                    found: json_kind(other),
                },
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_value<T: Serialize>(state: &T, what: &'static str) -> Result<Value, CoreError> {
    serde_json::to_value(state).map_err(|source| CoreError::Serialization { what, source })
}

// ── Keyed items ─────────────────────────────────────────────────────

impl<K, E> Persist for KeyedItems<K, E>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    E: Clone + Serialize + DeserializeOwned,
{
    fn snapshot(&self) -> Result<Value, CoreError> {
        to_value(self, "items")
    }

    fn restore_at(candidate: &Value, path: &str, report: &mut RestoreReport) -> Self {
        let Some(entries) = expect_object(candidate, path, report) else {
            return Self::default();
        };

        let mut owners = BTreeMap::new();
        for (raw_owner, value) in entries {
            let entry_path = join(path, raw_owner);
            if !value.is_object() {
                report.drop_entry(
                    entry_path,
                    DropReason::NotAnObject {
                        found: json_kind(value),
                    },
                );
                continue;
            }
            match serde_json::from_value::<EntityMap<K, E>>(value.clone()) {
                Ok(items) => {
                    owners.insert(OwnerId::from(raw_owner.as_str()), items);
                }
                Err(err) => report.drop_entry(
                    entry_path,
                    DropReason::Malformed {
                        message: err.to_string(),
                    },
                ),
            }
        }
        Self::from_owners(owners)
    }
}

// ── Site slice ──────────────────────────────────────────────────────
//
// Only items are persisted; trackers describe in-flight work of the
// previous session and always restart empty.

impl<F: Feature> Persist for SiteSlice<F> {
    fn snapshot(&self) -> Result<Value, CoreError> {
        let mut map = Map::new();
        map.insert("items".into(), self.items.snapshot()?);
        Ok(Value::Object(map))
    }

    fn restore_at(candidate: &Value, path: &str, report: &mut RestoreReport) -> Self {
        let Some(fields) = expect_object(candidate, path, report) else {
            return Self::default();
        };
        fields.get("items").map_or_else(Self::default, |items| {
            Self::with_items(KeyedItems::restore_at(
                items,
                &join(path, "items"),
                report,
            ))
        })
    }
}
