// ── Zoninator: content zones per site ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{EntityId, OwnerId, Zone};
use crate::reducer::{Feature, Route};
use crate::store::{EntityMap, ItemsEvent, RequestEvent, SaveEvent, SiteSlice};

/// Marker type parameterizing [`SiteSlice`] for zones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zoninator;

/// Zone state: `items[site][zone_id] = Zone`.
pub type ZonesState = SiteSlice<Zoninator>;

/// Zone actions, as produced by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ZoneAction {
    #[serde(rename = "ZONINATOR_REQUEST_ZONES", rename_all = "camelCase")]
    RequestZones { site_id: OwnerId },

    /// Zones fetched for a site; merged into what is already known.
    #[serde(rename = "ZONINATOR_UPDATE_ZONES", rename_all = "camelCase")]
    UpdateZones {
        site_id: OwnerId,
        data: EntityMap<EntityId, Zone>,
    },

    #[serde(rename = "ZONINATOR_REQUEST_ERROR", rename_all = "camelCase")]
    RequestError { site_id: OwnerId },

    #[serde(rename = "ZONINATOR_ADD_ZONE", rename_all = "camelCase")]
    AddZone {
        site_id: OwnerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },

    #[serde(rename = "ZONINATOR_SAVE_ZONE", rename_all = "camelCase")]
    SaveZone {
        site_id: OwnerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zone_id: Option<EntityId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },

    /// A single zone was saved; stores it and settles the save.
    #[serde(rename = "ZONINATOR_UPDATE_ZONE", rename_all = "camelCase")]
    UpdateZone {
        site_id: OwnerId,
        zone_id: EntityId,
        data: Zone,
    },

    #[serde(rename = "ZONINATOR_UPDATE_ZONE_ERROR", rename_all = "camelCase")]
    UpdateZoneError {
        site_id: OwnerId,
        #[serde(default)]
        error: Value,
    },
}

impl ZoneAction {
    /// Every `type` tag this vocabulary owns.
    pub const KINDS: [&'static str; 7] = [
        "ZONINATOR_REQUEST_ZONES",
        "ZONINATOR_UPDATE_ZONES",
        "ZONINATOR_REQUEST_ERROR",
        "ZONINATOR_ADD_ZONE",
        "ZONINATOR_SAVE_ZONE",
        "ZONINATOR_UPDATE_ZONE",
        "ZONINATOR_UPDATE_ZONE_ERROR",
    ];

    pub fn site_id(&self) -> &OwnerId {
        match self {
            Self::RequestZones { site_id }
            | Self::UpdateZones { site_id, .. }
            | Self::RequestError { site_id }
            | Self::AddZone { site_id, .. }
            | Self::SaveZone { site_id, .. }
            | Self::UpdateZone { site_id, .. }
            | Self::UpdateZoneError { site_id, .. } => site_id,
        }
    }
}

impl Feature for Zoninator {
    const NAME: &'static str = "zoninator";

    type Key = EntityId;
    type Entity = Zone;
    type Error = Value;
    type Action = ZoneAction;

    fn route(action: ZoneAction) -> Route<EntityId, Zone, Value> {
        match action {
            ZoneAction::RequestZones { site_id } => Route::requesting(RequestEvent::Started(site_id)),
            ZoneAction::UpdateZones { site_id, data } => Route::items(ItemsEvent::Merge {
                owner: site_id.clone(),
                items: data,
            })
            .and_requesting(RequestEvent::Succeeded(site_id)),
            ZoneAction::RequestError { site_id } => Route::requesting(RequestEvent::Failed(site_id)),
            ZoneAction::AddZone { site_id, .. } | ZoneAction::SaveZone { site_id, .. } => {
                Route::saving(SaveEvent::Started(site_id))
            }
            ZoneAction::UpdateZone {
                site_id,
                zone_id,
                data,
            } => Route::items(ItemsEvent::Upsert {
                owner: site_id.clone(),
                key: zone_id,
                entity: data,
            })
            .and_saving(SaveEvent::Succeeded(site_id)),
            ZoneAction::UpdateZoneError { site_id, error } => Route::saving(SaveEvent::Failed {
                owner: site_id,
                error,
            }),
        }
    }
}
