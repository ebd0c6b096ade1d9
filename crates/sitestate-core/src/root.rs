// ── Root state ──
//
// Every feature slice under one tree, one action type that fans out to
// all of them, and the persisted shape of the whole thing.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::feature::{CacheAction, SuperCacheState, ZoneAction, ZonesState};
use crate::persist::{Persist, RestoreReport, expect_object, join};
use crate::reducer::Reducer;

const ZONINATOR_KEY: &str = "zoninator";
const SUPER_CACHE_KEY: &str = "wpSuperCache";

/// Any action the root reducer accepts.
///
/// Deserialization routes on the `type` tag. A tag owned by a feature
/// must carry that variant's payload or decoding fails; any other tag
/// (or none) is kept as raw JSON and reduces to the identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Action {
    Zoninator(ZoneAction),
    SuperCache(CacheAction),
    Unrecognized(Value),
}

impl Action {
    /// The `type` tag, when there is one.
    pub fn kind(&self) -> Option<String> {
        match serde_json::to_value(self).ok()? {
            Value::Object(mut map) => match map.remove("type") {
                Some(Value::String(kind)) => Some(kind),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some(kind) if ZoneAction::KINDS.contains(&kind) => ZoneAction::deserialize(raw)
                .map(Self::Zoninator)
                .map_err(D::Error::custom),
            Some(kind) if CacheAction::KINDS.contains(&kind) => CacheAction::deserialize(raw)
                .map(Self::SuperCache)
                .map_err(D::Error::custom),
            _ => Ok(Self::Unrecognized(raw)),
        }
    }
}

impl From<ZoneAction> for Action {
    fn from(action: ZoneAction) -> Self {
        Self::Zoninator(action)
    }
}

impl From<CacheAction> for Action {
    fn from(action: CacheAction) -> Self {
        Self::SuperCache(action)
    }
}

/// The whole application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootState {
    pub zoninator: ZonesState,
    #[serde(rename = "wpSuperCache")]
    pub super_cache: SuperCacheState,
}

impl RootState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for RootState {
    type Action = Action;

    fn reduce(&self, action: Action) -> Self {
        match action {
            Action::Zoninator(action) => Self {
                zoninator: self.zoninator.reduce(action),
                super_cache: self.super_cache.clone(),
            },
            Action::SuperCache(action) => Self {
                zoninator: self.zoninator.clone(),
                super_cache: self.super_cache.reduce(action),
            },
            Action::Unrecognized(raw) => {
                tracing::debug!(action = %raw, "ignoring unrecognized action");
                self.clone()
            }
        }
    }
}

impl Persist for RootState {
    fn snapshot(&self) -> Result<Value, CoreError> {
        let mut map = Map::new();
        map.insert(ZONINATOR_KEY.into(), self.zoninator.snapshot()?);
        map.insert(SUPER_CACHE_KEY.into(), self.super_cache.snapshot()?);
        Ok(Value::Object(map))
    }

    fn restore_at(candidate: &Value, path: &str, report: &mut RestoreReport) -> Self {
        let Some(fields) = expect_object(candidate, path, report) else {
            return Self::default();
        };
        Self {
            zoninator: fields
                .get(ZONINATOR_KEY)
                .map(|value| ZonesState::restore_at(value, &join(path, ZONINATOR_KEY), report))
                .unwrap_or_default(),
            super_cache: fields
                .get(SUPER_CACHE_KEY)
                .map(|value| {
                    SuperCacheState::restore_at(value, &join(path, SUPER_CACHE_KEY), report)
                })
                .unwrap_or_default(),
        }
    }
}

// ── Action streams ──────────────────────────────────────────────────

/// Parse a batch of actions: either one JSON array, or JSON Lines (one
/// action per line, blank lines ignored).
pub fn parse_actions(input: &str) -> Result<Vec<Action>, CoreError> {
    let trimmed = input.trim_start();
    match trimmed.chars().next() {
        None => Ok(Vec::new()),
        Some('[') => {
            let values: Vec<Value> =
                serde_json::from_str(trimmed).map_err(|source| CoreError::InvalidAction {
                    location: "array".into(),
                    source,
                })?;
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).map_err(|source| CoreError::InvalidAction {
                        location: format!("index {index}"),
                        source,
                    })
                })
                .collect()
        }
        Some('{') => input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| CoreError::InvalidAction {
                    location: format!("line {}", index + 1),
                    source,
                })
            })
            .collect(),
        Some(other) => Err(CoreError::ActionStreamShape {
            found: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{EntityId, OwnerId, Zone};

    fn site(id: u64) -> OwnerId {
        OwnerId::from(id)
    }

    fn populated() -> RootState {
        RootState::new().reduce_all([
            Action::from(ZoneAction::UpdateZone {
                site_id: site(1),
                zone_id: EntityId::Numeric(10),
                data: Zone::new(10_u64, "Front page"),
            }),
            Action::from(ZoneAction::UpdateZone {
                site_id: site(2),
                zone_id: EntityId::Numeric(20),
                data: Zone::new(20_u64, "Sidebar"),
            }),
            Action::from(CacheAction::ReceiveSettings {
                site_id: site(1),
                settings: crate::feature::settings_from(json!({ "is_cache_enabled": true })),
            }),
        ])
    }

    #[test]
    fn known_kind_with_bad_payload_is_rejected() {
        let err = serde_json::from_value::<Action>(
            json!({ "type": "ZONINATOR_UPDATE_ZONES", "siteId": 1 }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("data"), "{err}");

        let err = parse_actions(concat!(
            r#"{"type":"ZONINATOR_REQUEST_ZONES","siteId":1}"#,
            "\n",
            r#"{"type":"WP_SUPER_CACHE_PRELOAD_CACHE_SUCCESS","siteId":1}"#,
            "\n",
        ))
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAction { ref location, .. } if location == "line 2"));
    }

    #[test]
    fn settling_actions_keep_sub_stores_consistent() {
        let actions = parse_actions(concat!(
            r#"{"type":"ZONINATOR_REQUEST_ZONES","siteId":1}"#,
            "\n",
            r#"{"type":"ZONINATOR_UPDATE_ZONES","siteId":1,"data":{"5":{"id":5}}}"#,
            "\n",
            r#"{"type":"WP_SUPER_CACHE_SAVE_SETTINGS","siteId":1}"#,
            "\n",
            r#"{"type":"WP_SUPER_CACHE_SAVE_SETTINGS_FAILURE","siteId":1}"#,
            "\n",
        ))
        .unwrap();
        assert!(actions.iter().all(Action::is_recognized));

        let state = RootState::new().reduce_all(actions);
        assert_eq!(
            state.zoninator.requesting.status(&site(1)),
            crate::store::RequestStatus::Settled
        );
        assert_eq!(
            state
                .zoninator
                .items
                .get(&site(1), &EntityId::Numeric(5))
                .and_then(Zone::id),
            Some(EntityId::Numeric(5))
        );
        let save = state.super_cache.slice.saving.status(&site(1)).unwrap();
        assert_eq!(save.phase(), crate::store::SavePhase::Error);
    }

    #[test]
    fn action_routes_on_type_tag() {
        let zone: Action =
            serde_json::from_value(json!({ "type": "ZONINATOR_REQUEST_ZONES", "siteId": 1 }))
                .unwrap();
        assert!(matches!(zone, Action::Zoninator(_)));

        let cache: Action = serde_json::from_value(
            json!({ "type": "WP_SUPER_CACHE_RESTORE_SETTINGS", "siteId": "example.com" }),
        )
        .unwrap();
        assert!(matches!(cache, Action::SuperCache(_)));

        let other: Action =
            serde_json::from_value(json!({ "type": "SOMETHING_ELSE", "siteId": 1 })).unwrap();
        assert!(!other.is_recognized());
        assert_eq!(other.kind().as_deref(), Some("SOMETHING_ELSE"));
    }

    #[test]
    fn unrecognized_action_is_identity() {
        let state = populated();
        let next = state.reduce(Action::Unrecognized(json!({ "type": "NOPE" })));
        assert_eq!(next, state);
    }

    #[test]
    fn feature_action_leaves_other_feature_shared() {
        let state = populated();
        let next = state.reduce(ZoneAction::RequestZones { site_id: site(3) }.into());
        assert!(Arc::ptr_eq(
            next.super_cache.slice.items.owner(&site(1)).unwrap(),
            state.super_cache.slice.items.owner(&site(1)).unwrap(),
        ));
        assert!(Arc::ptr_eq(
            next.zoninator.items.owner(&site(2)).unwrap(),
            state.zoninator.items.owner(&site(2)).unwrap(),
        ));
    }

    #[test]
    fn snapshot_uses_feature_keys() {
        let snapshot = populated().snapshot().unwrap();
        assert_eq!(
            snapshot,
            json!({
                "zoninator": { "items": {
                    "1": { "10": { "id": 10, "name": "Front page" } },
                    "2": { "20": { "id": 20, "name": "Sidebar" } },
                } },
                "wpSuperCache": { "items": { "1": { "is_cache_enabled": true } } },
            })
        );
    }

    #[test]
    fn restore_round_trips_items() {
        let state = populated().reduce(ZoneAction::RequestZones { site_id: site(1) }.into());
        let restored = RootState::restore(&state.snapshot().unwrap());
        assert_eq!(restored.zoninator.items, state.zoninator.items);
        assert_eq!(restored.super_cache.slice.items, state.super_cache.slice.items);
        // trackers always restart empty
        assert!(restored.zoninator.requesting.is_empty());
        assert!(restored.zoninator.saving.is_empty());
    }

    #[test]
    fn restore_reports_nested_paths() {
        let mut report = RestoreReport::default();
        let restored = RootState::restore_with(
            &json!({
                "zoninator": { "items": { "1": 5 } },
                "wpSuperCache": { "items": { "2": { "ok": true }, "3": [] } },
            }),
            &mut report,
        );
        assert!(restored.zoninator.items.is_empty());
        assert_eq!(restored.super_cache.slice.items.len(), 1);

        let paths: Vec<_> = report.dropped.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["zoninator.items.1", "wpSuperCache.items.3"]);
    }

    #[test]
    fn restore_tolerates_missing_features() {
        let mut report = RestoreReport::default();
        let restored = RootState::restore_with(&json!({}), &mut report);
        assert_eq!(restored, RootState::default());
        assert!(report.is_clean());
    }

    #[test]
    fn parses_json_lines() {
        let input = concat!(
            r#"{"type":"ZONINATOR_REQUEST_ZONES","siteId":1}"#,
            "\n\n",
            r#"{"type":"WP_SUPER_CACHE_REQUEST_SETTINGS","siteId":2}"#,
            "\n",
        );
        let actions = parse_actions(input).unwrap();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(Action::is_recognized));
    }

    #[test]
    fn parses_json_array() {
        let actions = parse_actions(r#"[{"type":"ZONINATOR_REQUEST_ZONES","siteId":1},{"type":"X"}]"#)
            .unwrap();
        assert_eq!(actions.len(), 2);
        assert!(!actions[1].is_recognized());
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse_actions("{\"type\":\"X\"}\n{oops\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidAction { ref location, .. } if location == "line 2"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(
            parse_actions("42"),
            Err(CoreError::ActionStreamShape { .. })
        ));
        assert!(parse_actions("  \n").unwrap().is_empty());
    }
}
