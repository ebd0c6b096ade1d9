// ── Request status tracker ──
//
// owner -> "fetch in flight". Stored as a plain bool map so the wire
// shape stays `{ "<site>": true }`; reads go through `RequestStatus`,
// which tells "never asked" apart from "asked and settled".

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::OwnerId;
use crate::reducer::Reducer;

/// Events accepted by [`RequestTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    Started(OwnerId),
    Succeeded(OwnerId),
    Failed(OwnerId),
}

impl RequestEvent {
    pub fn owner(&self) -> &OwnerId {
        match self {
            Self::Started(owner) | Self::Succeeded(owner) | Self::Failed(owner) => owner,
        }
    }
}

/// Lifecycle of the most recent fetch for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RequestStatus {
    /// No fetch has been started for this owner.
    NotRequested,
    InFlight,
    /// The last fetch finished, successfully or not.
    Settled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestTracker {
    owners: Arc<BTreeMap<OwnerId, bool>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, owner: &OwnerId) -> RequestStatus {
        match self.owners.get(owner) {
            None => RequestStatus::NotRequested,
            Some(true) => RequestStatus::InFlight,
            Some(false) => RequestStatus::Settled,
        }
    }

    /// `true` only while a fetch is in flight; absent owners read as `false`.
    pub fn is_requesting(&self, owner: &OwnerId) -> bool {
        self.status(owner) == RequestStatus::InFlight
    }

    pub fn owners(&self) -> impl Iterator<Item = (&OwnerId, bool)> {
        self.owners.iter().map(|(owner, flag)| (owner, *flag))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn with_flag(&self, owner: OwnerId, in_flight: bool) -> Self {
        let mut owners = (*self.owners).clone();
        owners.insert(owner, in_flight);
        Self {
            owners: Arc::new(owners),
        }
    }
}

impl Reducer for RequestTracker {
    type Action = RequestEvent;

    fn reduce(&self, action: Self::Action) -> Self {
        match action {
            RequestEvent::Started(owner) => self.with_flag(owner, true),
            RequestEvent::Succeeded(owner) | RequestEvent::Failed(owner) => {
                self.with_flag(owner, false)
            }
        }
    }
}
