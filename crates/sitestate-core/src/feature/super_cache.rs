// ── WP Super Cache: one settings bundle per site ──
//
// Besides the generic slice this feature tracks a second request
// flag, `restoring`, for "reset settings to defaults" round-trips.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{OwnerId, Settings};
use crate::persist::{Persist, RestoreReport};
use crate::reducer::{Feature, Reducer, Route};
use crate::store::{ItemsEvent, RequestEvent, RequestTracker, SaveEvent, SiteSlice};

/// Setting toggled by preload success.
pub const PRELOADING_FIELD: &str = "is_preloading";

/// Marker type parameterizing [`SiteSlice`] for cache settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperCache;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CacheAction {
    #[serde(rename = "WP_SUPER_CACHE_REQUEST_SETTINGS", rename_all = "camelCase")]
    RequestSettings { site_id: OwnerId },

    #[serde(
        rename = "WP_SUPER_CACHE_REQUEST_SETTINGS_SUCCESS",
        rename_all = "camelCase"
    )]
    RequestSettingsSuccess { site_id: OwnerId },

    #[serde(
        rename = "WP_SUPER_CACHE_REQUEST_SETTINGS_FAILURE",
        rename_all = "camelCase"
    )]
    RequestSettingsFailure { site_id: OwnerId },

    /// Settings fetched for a site; replace the whole bundle.
    #[serde(rename = "WP_SUPER_CACHE_RECEIVE_SETTINGS", rename_all = "camelCase")]
    ReceiveSettings { site_id: OwnerId, settings: Settings },

    #[serde(rename = "WP_SUPER_CACHE_SAVE_SETTINGS", rename_all = "camelCase")]
    SaveSettings {
        site_id: OwnerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settings: Option<Settings>,
    },

    #[serde(
        rename = "WP_SUPER_CACHE_SAVE_SETTINGS_SUCCESS",
        rename_all = "camelCase"
    )]
    SaveSettingsSuccess { site_id: OwnerId },

    #[serde(
        rename = "WP_SUPER_CACHE_SAVE_SETTINGS_FAILURE",
        rename_all = "camelCase"
    )]
    SaveSettingsFailure {
        site_id: OwnerId,
        #[serde(default)]
        error: Value,
    },

    #[serde(rename = "WP_SUPER_CACHE_RESTORE_SETTINGS", rename_all = "camelCase")]
    RestoreSettings { site_id: OwnerId },

    #[serde(
        rename = "WP_SUPER_CACHE_RESTORE_SETTINGS_SUCCESS",
        rename_all = "camelCase"
    )]
    RestoreSettingsSuccess { site_id: OwnerId },

    #[serde(
        rename = "WP_SUPER_CACHE_RESTORE_SETTINGS_FAILURE",
        rename_all = "camelCase"
    )]
    RestoreSettingsFailure { site_id: OwnerId },

    #[serde(rename = "WP_SUPER_CACHE_PRELOAD_CACHE_SUCCESS", rename_all = "camelCase")]
    PreloadCacheSuccess { site_id: OwnerId, preloading: bool },
}

impl CacheAction {
    /// Every `type` tag this vocabulary owns.
    pub const KINDS: [&'static str; 11] = [
        "WP_SUPER_CACHE_REQUEST_SETTINGS",
        "WP_SUPER_CACHE_REQUEST_SETTINGS_SUCCESS",
        "WP_SUPER_CACHE_REQUEST_SETTINGS_FAILURE",
        "WP_SUPER_CACHE_RECEIVE_SETTINGS",
        "WP_SUPER_CACHE_SAVE_SETTINGS",
        "WP_SUPER_CACHE_SAVE_SETTINGS_SUCCESS",
        "WP_SUPER_CACHE_SAVE_SETTINGS_FAILURE",
        "WP_SUPER_CACHE_RESTORE_SETTINGS",
        "WP_SUPER_CACHE_RESTORE_SETTINGS_SUCCESS",
        "WP_SUPER_CACHE_RESTORE_SETTINGS_FAILURE",
        "WP_SUPER_CACHE_PRELOAD_CACHE_SUCCESS",
    ];

    pub fn site_id(&self) -> &OwnerId {
        match self {
            Self::RequestSettings { site_id }
            | Self::RequestSettingsSuccess { site_id }
            | Self::RequestSettingsFailure { site_id }
            | Self::ReceiveSettings { site_id, .. }
            | Self::SaveSettings { site_id, .. }
            | Self::SaveSettingsSuccess { site_id }
            | Self::SaveSettingsFailure { site_id, .. }
            | Self::RestoreSettings { site_id }
            | Self::RestoreSettingsSuccess { site_id }
            | Self::RestoreSettingsFailure { site_id }
            | Self::PreloadCacheSuccess { site_id, .. } => site_id,
        }
    }

    /// Event for the `restoring` tracker, if this action drives it.
    fn restoring_event(&self) -> Option<RequestEvent> {
        match self {
            Self::RestoreSettings { site_id } => Some(RequestEvent::Started(site_id.clone())),
            Self::RestoreSettingsSuccess { site_id } => {
                Some(RequestEvent::Succeeded(site_id.clone()))
            }
            Self::RestoreSettingsFailure { site_id } => Some(RequestEvent::Failed(site_id.clone())),
            _ => None,
        }
    }
}

impl Feature for SuperCache {
    const NAME: &'static str = "wpSuperCache";

    type Key = String;
    type Entity = Value;
    type Error = Value;
    type Action = CacheAction;

    fn route(action: CacheAction) -> Route<String, Value, Value> {
        match action {
            CacheAction::RequestSettings { site_id } => {
                Route::requesting(RequestEvent::Started(site_id))
            }
            CacheAction::RequestSettingsSuccess { site_id } => {
                Route::requesting(RequestEvent::Succeeded(site_id))
            }
            CacheAction::RequestSettingsFailure { site_id } => {
                Route::requesting(RequestEvent::Failed(site_id))
            }
            CacheAction::ReceiveSettings { site_id, settings } => {
                Route::items(ItemsEvent::Replace {
                    owner: site_id,
                    items: settings,
                })
            }
            CacheAction::SaveSettings { site_id, .. } => Route::saving(SaveEvent::Started(site_id)),
            CacheAction::SaveSettingsSuccess { site_id } => {
                Route::saving(SaveEvent::Succeeded(site_id))
            }
            CacheAction::SaveSettingsFailure { site_id, error } => {
                Route::saving(SaveEvent::Failed {
                    owner: site_id,
                    error,
                })
            }
            CacheAction::PreloadCacheSuccess {
                site_id,
                preloading,
            } => Route::items(ItemsEvent::Patch {
                owner: site_id,
                key: PRELOADING_FIELD.to_owned(),
                entity: Value::Bool(preloading),
            }),
            // handled by the `restoring` tracker in `SuperCacheState`
            CacheAction::RestoreSettings { .. }
            | CacheAction::RestoreSettingsSuccess { .. }
            | CacheAction::RestoreSettingsFailure { .. } => Route::none(),
        }
    }
}

/// Cache settings state: the generic slice plus `restoring`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuperCacheState {
    #[serde(flatten)]
    pub slice: SiteSlice<SuperCache>,
    pub restoring: RequestTracker,
}

impl SuperCacheState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self, site: &OwnerId) -> Option<&Settings> {
        self.slice.items.owner(site).map(Arc::as_ref)
    }

    pub fn is_preloading(&self, site: &OwnerId) -> Option<bool> {
        self.settings(site)?.get(PRELOADING_FIELD)?.as_bool()
    }
}

impl Reducer for SuperCacheState {
    type Action = CacheAction;

    fn reduce(&self, action: CacheAction) -> Self {
        let restoring = action.restoring_event().map_or_else(
            || self.restoring.clone(),
            |event| self.restoring.reduce(event),
        );
        Self {
            slice: self.slice.reduce(action),
            restoring,
        }
    }
}

impl Persist for SuperCacheState {
    fn snapshot(&self) -> Result<Value, CoreError> {
        self.slice.snapshot()
    }

    fn restore_at(candidate: &Value, path: &str, report: &mut RestoreReport) -> Self {
        Self {
            slice: SiteSlice::restore_at(candidate, path, report),
            restoring: RequestTracker::default(),
        }
    }
}

/// Convenience for building a settings bundle from JSON.
pub fn settings_from(value: Value) -> Settings {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => Settings::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::store::SavePhase;

    const PRIMARY: u64 = 123_456;
    const SECONDARY: u64 = 456_789;

    fn receive(site: u64, settings: Value) -> CacheAction {
        CacheAction::ReceiveSettings {
            site_id: site.into(),
            settings: settings_from(settings),
        }
    }

    fn items_json(state: &SuperCacheState) -> Value {
        serde_json::to_value(&state.slice.items).unwrap()
    }

    #[test]
    fn defaults_to_empty_trees() {
        let json = serde_json::to_value(SuperCacheState::new()).unwrap();
        assert_eq!(
            json,
            json!({ "items": {}, "requesting": {}, "saving": {}, "restoring": {} })
        );
    }

    #[test]
    fn requesting_lifecycle() {
        let state = SuperCacheState::new()
            .reduce(CacheAction::RequestSettings {
                site_id: PRIMARY.into(),
            })
            .reduce(CacheAction::RequestSettings {
                site_id: SECONDARY.into(),
            })
            .reduce(CacheAction::RequestSettingsSuccess {
                site_id: PRIMARY.into(),
            });
        assert_eq!(
            serde_json::to_value(&state.slice.requesting).unwrap(),
            json!({ "123456": false, "456789": true })
        );
    }

    #[test]
    fn request_failure_settles() {
        let state = SuperCacheState::new()
            .reduce(CacheAction::RequestSettings {
                site_id: PRIMARY.into(),
            })
            .reduce(CacheAction::RequestSettingsFailure {
                site_id: PRIMARY.into(),
            });
        assert!(!state.slice.requesting.is_requesting(&PRIMARY.into()));
    }

    #[test]
    fn receive_indexes_settings_by_site() {
        let state = SuperCacheState::new().reduce(receive(PRIMARY, json!({ "is_cache_enabled": true })));
        assert_eq!(
            items_json(&state),
            json!({ "123456": { "is_cache_enabled": true } })
        );
    }

    #[test]
    fn receive_accumulates_sites() {
        let state = SuperCacheState::new()
            .reduce(receive(PRIMARY, json!({ "is_cache_enabled": true })))
            .reduce(receive(SECONDARY, json!({ "is_cache_enabled": false })));
        assert_eq!(
            items_json(&state),
            json!({
                "123456": { "is_cache_enabled": true },
                "456789": { "is_cache_enabled": false },
            })
        );
    }

    #[test]
    fn receive_replaces_bundle_of_same_site() {
        let state = SuperCacheState::new()
            .reduce(receive(
                PRIMARY,
                json!({ "is_cache_enabled": true, "cache_type": "wpcache" }),
            ))
            .reduce(receive(
                PRIMARY,
                json!({ "is_cache_enabled": false, "is_super_cache_enabled": true }),
            ));
        assert_eq!(
            items_json(&state),
            json!({ "123456": { "is_cache_enabled": false, "is_super_cache_enabled": true } })
        );
    }

    #[test]
    fn save_lifecycle() {
        let pending = SuperCacheState::new().reduce(CacheAction::SaveSettings {
            site_id: PRIMARY.into(),
            settings: None,
        });
        assert_eq!(
            serde_json::to_value(&pending.slice.saving).unwrap(),
            json!({ "123456": { "saving": true, "status": "pending", "error": false } })
        );

        let failed = pending.reduce(CacheAction::SaveSettingsFailure {
            site_id: PRIMARY.into(),
            error: json!("my error"),
        });
        assert_eq!(
            serde_json::to_value(&failed.slice.saving).unwrap(),
            json!({ "123456": { "saving": false, "status": "error", "error": "my error" } })
        );

        let saved = pending.reduce(CacheAction::SaveSettingsSuccess {
            site_id: PRIMARY.into(),
        });
        assert_eq!(
            serde_json::to_value(&saved.slice.saving).unwrap(),
            json!({ "123456": { "saving": false, "status": "success", "error": false } })
        );
    }

    #[test]
    fn restoring_lifecycle() {
        let state = SuperCacheState::new()
            .reduce(CacheAction::RestoreSettings {
                site_id: PRIMARY.into(),
            })
            .reduce(CacheAction::RestoreSettings {
                site_id: SECONDARY.into(),
            });
        assert_eq!(
            serde_json::to_value(&state.restoring).unwrap(),
            json!({ "123456": true, "456789": true })
        );

        let state = state
            .reduce(CacheAction::RestoreSettingsSuccess {
                site_id: PRIMARY.into(),
            })
            .reduce(CacheAction::RestoreSettingsFailure {
                site_id: SECONDARY.into(),
            });
        assert_eq!(
            serde_json::to_value(&state.restoring).unwrap(),
            json!({ "123456": false, "456789": false })
        );
        // restoring never touches the fetch tracker
        assert!(state.slice.requesting.is_empty());
    }

    #[test]
    fn preload_toggles_flag_only() {
        let state = SuperCacheState::new()
            .reduce(receive(
                PRIMARY,
                json!({ "is_preloading": false, "is_cache_enabled": true }),
            ))
            .reduce(CacheAction::PreloadCacheSuccess {
                site_id: PRIMARY.into(),
                preloading: true,
            });
        assert_eq!(state.is_preloading(&PRIMARY.into()), Some(true));
        assert_eq!(
            state.settings(&PRIMARY.into()).unwrap().get("is_cache_enabled"),
            Some(&json!(true))
        );

        let state = state.reduce(CacheAction::PreloadCacheSuccess {
            site_id: PRIMARY.into(),
            preloading: false,
        });
        assert_eq!(state.is_preloading(&PRIMARY.into()), Some(false));
    }

    #[test]
    fn preload_for_unknown_site_is_noop() {
        let before = SuperCacheState::new().reduce(receive(PRIMARY, json!({ "a": 1 })));
        let after = before.reduce(CacheAction::PreloadCacheSuccess {
            site_id: SECONDARY.into(),
            preloading: true,
        });
        assert_eq!(after, before);
        assert!(after.settings(&SECONDARY.into()).is_none());
    }

    #[test]
    fn persists_items_only() {
        let state = SuperCacheState::new()
            .reduce(receive(PRIMARY, json!({ "is_cache_enabled": true })))
            .reduce(CacheAction::RestoreSettings {
                site_id: PRIMARY.into(),
            });
        let snapshot = state.snapshot().unwrap();
        assert_eq!(
            snapshot,
            json!({ "items": { "123456": { "is_cache_enabled": true } } })
        );

        let restored = SuperCacheState::restore(&snapshot);
        assert_eq!(restored.slice.items, state.slice.items);
        assert!(restored.restoring.is_empty());
    }

    #[test]
    fn failure_without_error_payload_still_settles() {
        let failed = SuperCacheState::new()
            .reduce(CacheAction::SaveSettings {
                site_id: PRIMARY.into(),
                settings: None,
            })
            .reduce(
                serde_json::from_value(json!({
                    "type": "WP_SUPER_CACHE_SAVE_SETTINGS_FAILURE",
                    "siteId": 123_456,
                }))
                .unwrap(),
            );
        let status = failed.slice.saving.status(&PRIMARY.into()).unwrap();
        assert_eq!(status.phase(), SavePhase::Error);
        assert_eq!(status.error(), Some(&Value::Null));
    }

    #[test]
    fn every_listed_kind_parses() {
        for kind in CacheAction::KINDS {
            let parsed: CacheAction = serde_json::from_value(json!({
                "type": kind, "siteId": 1, "settings": {}, "error": "x", "preloading": true,
            }))
            .unwrap();
            assert_eq!(serde_json::to_value(&parsed).unwrap()["type"], json!(kind));
        }
    }

    #[test]
    fn invalid_persisted_settings_are_dropped() {
        let restored = SuperCacheState::restore(&json!({ "items": { "123456": 2 } }));
        assert!(restored.slice.items.is_empty());
    }

    #[test]
    fn parses_wire_actions() {
        let parsed: CacheAction = serde_json::from_value(json!({
            "type": "WP_SUPER_CACHE_PRELOAD_CACHE_SUCCESS",
            "siteId": 123_456,
            "preloading": true,
        }))
        .unwrap();
        assert_eq!(
            parsed,
            CacheAction::PreloadCacheSuccess {
                site_id: PRIMARY.into(),
                preloading: true,
            }
        );
    }
}
