// ── Save status tracker ──
//
// owner -> lifecycle of the most recent write. In memory this is the
// `SaveStatus` enum; on the wire it is the flat record
// `{ saving, status, error }` with `error: false` when there is none.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::OwnerId;
use crate::reducer::Reducer;

/// Events accepted by [`SaveTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent<Err> {
    /// A save (or a create) was submitted.
    Started(OwnerId),
    Succeeded(OwnerId),
    Failed { owner: OwnerId, error: Err },
}

impl<Err> SaveEvent<Err> {
    pub fn owner(&self) -> &OwnerId {
        match self {
            Self::Started(owner) | Self::Succeeded(owner) | Self::Failed { owner, .. } => owner,
        }
    }
}

/// Wire-level phase of a save.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SavePhase {
    Pending,
    Success,
    Error,
}

/// Lifecycle of the most recent save for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "SaveRecord<Err>",
    try_from = "SaveRecord<Err>",
    bound(
        serialize = "Err: Clone + Serialize",
        deserialize = "Err: Deserialize<'de>"
    )
)]
pub enum SaveStatus<Err> {
    Pending,
    Success,
    /// The error payload is kept verbatim for the caller to render.
    Failed(Err),
}

impl<Err> SaveStatus<Err> {
    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn phase(&self) -> SavePhase {
        match self {
            Self::Pending => SavePhase::Pending,
            Self::Success => SavePhase::Success,
            Self::Failed(_) => SavePhase::Error,
        }
    }

    pub fn error(&self) -> Option<&Err> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Pending | Self::Success => None,
        }
    }
}

// ── Wire record ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "Err: Serialize", deserialize = "Err: Deserialize<'de>"))]
struct SaveRecord<Err> {
    saving: bool,
    status: SavePhase,
    #[serde(with = "error_slot")]
    error: Option<Err>,
}

impl<Err> From<SaveStatus<Err>> for SaveRecord<Err> {
    fn from(status: SaveStatus<Err>) -> Self {
        let saving = status.is_saving();
        let phase = status.phase();
        let error = match status {
            SaveStatus::Failed(err) => Some(err),
            SaveStatus::Pending | SaveStatus::Success => None,
        };
        Self {
            saving,
            status: phase,
            error,
        }
    }
}

impl<Err> TryFrom<SaveRecord<Err>> for SaveStatus<Err> {
    type Error = String;

    fn try_from(record: SaveRecord<Err>) -> Result<Self, Self::Error> {
        match (record.status, record.error) {
            (SavePhase::Pending, _) => Ok(Self::Pending),
            (SavePhase::Success, _) => Ok(Self::Success),
            (SavePhase::Error, Some(err)) => Ok(Self::Failed(err)),
            (SavePhase::Error, None) => Err("save status 'error' requires an error payload".into()),
        }
    }
}

/// `error: false` when absent, the payload itself otherwise.
///
/// Decoding tries the payload first, so a failure whose payload really
/// is `false` reads back as that payload wherever `Err` can hold a bool.
/// For pending and successful saves the slot is ignored either way.
mod error_slot {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<Err, S>(error: &Option<Err>, serializer: S) -> Result<S::Ok, S::Error>
    where
        Err: Serialize,
        S: Serializer,
    {
        match error {
            Some(err) => err.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, Err, D>(deserializer: D) -> Result<Option<Err>, D::Error>
    where
        Err: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Slot<Err> {
            Payload(Err),
            Flag(bool),
        }

        Ok(match Slot::deserialize(deserializer)? {
            Slot::Flag(false) => None,
            Slot::Flag(true) => {
                return Err(serde::de::Error::custom(
                    "error flag `true` carries no payload",
                ));
            }
            Slot::Payload(err) => Some(err),
        })
    }
}

// ── Tracker ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "Err: Clone + Serialize",
    deserialize = "Err: Deserialize<'de>"
))]
pub struct SaveTracker<Err> {
    owners: Arc<BTreeMap<OwnerId, SaveStatus<Err>>>,
}

impl<Err> Default for SaveTracker<Err> {
    fn default() -> Self {
        Self {
            owners: Arc::new(BTreeMap::new()),
        }
    }
}

impl<Err: Clone> SaveTracker<Err> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, owner: &OwnerId) -> Option<&SaveStatus<Err>> {
        self.owners.get(owner)
    }

    pub fn is_saving(&self, owner: &OwnerId) -> bool {
        self.status(owner).is_some_and(SaveStatus::is_saving)
    }

    pub fn owners(&self) -> impl Iterator<Item = (&OwnerId, &SaveStatus<Err>)> {
        self.owners.iter()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn with_status(&self, owner: OwnerId, status: SaveStatus<Err>) -> Self {
        let mut owners = (*self.owners).clone();
        owners.insert(owner, status);
        Self {
            owners: Arc::new(owners),
        }
    }
}

impl<Err: Clone> Reducer for SaveTracker<Err> {
    type Action = SaveEvent<Err>;

    fn reduce(&self, action: Self::Action) -> Self {
        match action {
            SaveEvent::Started(owner) => self.with_status(owner, SaveStatus::Pending),
            SaveEvent::Succeeded(owner) => self.with_status(owner, SaveStatus::Success),
            SaveEvent::Failed { owner, error } => {
                self.with_status(owner, SaveStatus::Failed(error))
            }
        }
    }
}
