#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{Value, json};
use sitestate_core::{
    Action, CacheAction, EntityId, OwnerId, Persist, Reducer, RootState, Settings, Zone,
    ZoneAction,
};

// ── Strategies ──────────────────────────────────────────────────────

fn owner() -> impl Strategy<Value = OwnerId> {
    prop_oneof![
        (1_u64..6).prop_map(OwnerId::from),
        "[a-z][a-z.]{0,8}".prop_map(OwnerId::from),
    ]
}

/// A zone keyed by its own id, sometimes carrying attributes the crate
/// has no accessor for.
fn zone() -> impl Strategy<Value = (EntityId, Zone)> {
    (
        1_u64..20,
        "[A-Za-z ]{1,12}",
        proptest::option::of("[a-z ]{0,16}"),
        proptest::option::of(any::<u32>()),
    )
        .prop_map(|(id, name, description, term_id)| {
            let mut zone = Zone::new(id, name);
            if let Some(description) = description {
                zone = zone.with_description(description);
            }
            if let Some(term_id) = term_id {
                zone = zone.with_field("term_id", Value::from(term_id));
            }
            (EntityId::Numeric(id), zone)
        })
}

fn setting_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn settings() -> impl Strategy<Value = Settings> {
    proptest::collection::btree_map("[a-z_]{1,10}", setting_value(), 0..5)
}

fn zone_action() -> impl Strategy<Value = ZoneAction> {
    prop_oneof![
        owner().prop_map(|site_id| ZoneAction::RequestZones { site_id }),
        owner().prop_map(|site_id| ZoneAction::RequestError { site_id }),
        (owner(), proptest::collection::vec(zone(), 0..4)).prop_map(|(site_id, zones)| {
            ZoneAction::UpdateZones {
                site_id,
                data: zones.into_iter().collect(),
            }
        }),
        (owner(), zone()).prop_map(|(site_id, (zone_id, data))| ZoneAction::UpdateZone {
            site_id,
            zone_id,
            data,
        }),
        owner().prop_map(|site_id| ZoneAction::AddZone {
            site_id,
            data: None
        }),
        owner().prop_map(|site_id| ZoneAction::UpdateZoneError {
            site_id,
            error: json!("failed"),
        }),
    ]
}

fn cache_action() -> impl Strategy<Value = CacheAction> {
    prop_oneof![
        owner().prop_map(|site_id| CacheAction::RequestSettings { site_id }),
        owner().prop_map(|site_id| CacheAction::RequestSettingsSuccess { site_id }),
        (owner(), settings())
            .prop_map(|(site_id, settings)| CacheAction::ReceiveSettings { site_id, settings }),
        owner().prop_map(|site_id| CacheAction::SaveSettings {
            site_id,
            settings: None
        }),
        owner().prop_map(|site_id| CacheAction::SaveSettingsSuccess { site_id }),
        owner().prop_map(|site_id| CacheAction::RestoreSettings { site_id }),
        (owner(), any::<bool>()).prop_map(|(site_id, preloading)| {
            CacheAction::PreloadCacheSuccess {
                site_id,
                preloading,
            }
        }),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        zone_action().prop_map(Action::from),
        cache_action().prop_map(Action::from),
        Just(Action::Unrecognized(json!({ "type": "UNKNOWN" }))),
    ]
}

fn state() -> impl Strategy<Value = RootState> {
    proptest::collection::vec(action(), 0..24).prop_map(|actions| RootState::new().reduce_all(actions))
}

fn touched(action: &Action) -> Option<&OwnerId> {
    match action {
        Action::Zoninator(action) => Some(action.site_id()),
        Action::SuperCache(action) => Some(action.site_id()),
        Action::Unrecognized(_) => None,
    }
}

// ── Properties ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn untouched_owners_keep_their_allocation(before in state(), action in action()) {
        let site = touched(&action).cloned();
        let after = before.reduce(action);

        for (owner, zones) in before.zoninator.items.owners() {
            if Some(owner) != site.as_ref() {
                prop_assert!(Arc::ptr_eq(zones, after.zoninator.items.owner(owner).unwrap()));
            }
        }
        for (owner, bundle) in before.super_cache.slice.items.owners() {
            if Some(owner) != site.as_ref() {
                prop_assert!(Arc::ptr_eq(bundle, after.super_cache.slice.items.owner(owner).unwrap()));
            }
        }
    }

    #[test]
    fn reduction_never_mutates_input(before in state(), action in action()) {
        let copy = before.snapshot().unwrap();
        let _ = before.reduce(action);
        prop_assert_eq!(before.snapshot().unwrap(), copy);
    }

    #[test]
    fn settling_actions_are_idempotent(before in state(), site in owner(), (zone_id, zone) in zone()) {
        let settling = [
            Action::from(ZoneAction::UpdateZone { site_id: site.clone(), zone_id, data: zone }),
            Action::from(CacheAction::RequestSettingsSuccess { site_id: site.clone() }),
            Action::from(CacheAction::SaveSettingsSuccess { site_id: site.clone() }),
            Action::from(CacheAction::PreloadCacheSuccess { site_id: site, preloading: true }),
        ];
        for action in settling {
            let once = before.reduce(action.clone());
            let twice = once.reduce(action);
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn restore_of_snapshot_keeps_items(state in state()) {
        let restored = RootState::restore(&state.snapshot().unwrap());
        prop_assert_eq!(&restored.zoninator.items, &state.zoninator.items);
        prop_assert_eq!(&restored.super_cache.slice.items, &state.super_cache.slice.items);
        prop_assert!(restored.zoninator.requesting.is_empty());
        prop_assert!(restored.super_cache.restoring.is_empty());
    }

    #[test]
    fn zone_owner_mappings_survive_verbatim(
        entries in proptest::collection::btree_map("[a-z0-9]{1,4}", setting_value(), 0..4),
    ) {
        let owner = Value::Object(entries.into_iter().collect());
        let snapshot = json!({ "zoninator": { "items": { "1": owner.clone() } } });
        let restored = RootState::restore(&snapshot);
        prop_assert_eq!(&restored.snapshot().unwrap()["zoninator"]["items"]["1"], &owner);
    }

    #[test]
    fn primitive_owner_entries_are_dropped(
        good in settings(),
        bad in prop_oneof![any::<i64>().prop_map(Value::from), any::<bool>().prop_map(Value::from), Just(Value::Null)],
    ) {
        let snapshot = json!({ "wpSuperCache": { "items": { "1": good.clone(), "2": bad } } });
        let restored = RootState::restore(&snapshot);
        let items = &restored.super_cache.slice.items;
        prop_assert_eq!(items.len(), 1);
        prop_assert_eq!(items.owner(&OwnerId::from(1_u64)).map(|b| (**b).clone()), Some(good));
        prop_assert!(items.owner(&OwnerId::from(2_u64)).is_none());
    }
}

#[test]
fn numeric_and_named_owners_coexist() {
    let state = RootState::new().reduce_all([
        Action::from(CacheAction::ReceiveSettings {
            site_id: OwnerId::from(7_u64),
            settings: BTreeMap::from([("a".to_owned(), json!(1))]),
        }),
        Action::from(CacheAction::ReceiveSettings {
            site_id: OwnerId::from("example.com"),
            settings: BTreeMap::from([("b".to_owned(), json!(2))]),
        }),
    ]);
    let restored = RootState::restore(&state.snapshot().unwrap());
    let owners: Vec<_> = restored
        .super_cache
        .slice
        .items
        .owners()
        .map(|(owner, _)| owner.clone())
        .collect();
    assert_eq!(
        owners,
        [EntityId::Numeric(7), EntityId::Named("example.com".into())]
    );
}
