// ── Keyed item store ──
//
// owner -> entity key -> entity. Both levels are behind `Arc` so a
// reduction only reallocates the owner it touches; every other owner
// keeps its allocation in the new state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::OwnerId;
use crate::reducer::Reducer;

/// Entities owned by a single site.
pub type EntityMap<K, E> = BTreeMap<K, E>;

/// Events accepted by [`KeyedItems`].
#[derive(Debug, Clone, PartialEq)]
pub enum ItemsEvent<K, E> {
    /// Replace the owner's whole collection.
    Replace {
        owner: OwnerId,
        items: EntityMap<K, E>,
    },
    /// Merge into the owner's collection; incoming entities win.
    Merge {
        owner: OwnerId,
        items: EntityMap<K, E>,
    },
    /// Set one entity, creating the owner entry if needed.
    Upsert { owner: OwnerId, key: K, entity: E },
    /// Set one entity on an existing owner. No-op when the owner is absent.
    Patch { owner: OwnerId, key: K, entity: E },
}

impl<K, E> ItemsEvent<K, E> {
    pub fn owner(&self) -> &OwnerId {
        match self {
            Self::Replace { owner, .. }
            | Self::Merge { owner, .. }
            | Self::Upsert { owner, .. }
            | Self::Patch { owner, .. } => owner,
        }
    }
}

/// Entities keyed first by owner, then by entity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Ord + Serialize, E: Serialize",
    deserialize = "K: Ord + Deserialize<'de>, E: Deserialize<'de>"
))]
pub struct KeyedItems<K, E> {
    owners: Arc<BTreeMap<OwnerId, Arc<EntityMap<K, E>>>>,
}

impl<K, E> Default for KeyedItems<K, E> {
    fn default() -> Self {
        Self {
            owners: Arc::new(BTreeMap::new()),
        }
    }
}

impl<K: Ord + Clone, E: Clone> KeyedItems<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-validated owner collections.
    pub fn from_owners(owners: BTreeMap<OwnerId, EntityMap<K, E>>) -> Self {
        Self {
            owners: Arc::new(
                owners
                    .into_iter()
                    .map(|(owner, items)| (owner, Arc::new(items)))
                    .collect(),
            ),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn owner(&self, owner: &OwnerId) -> Option<&Arc<EntityMap<K, E>>> {
        self.owners.get(owner)
    }

    pub fn get(&self, owner: &OwnerId, key: &K) -> Option<&E> {
        self.owners.get(owner)?.get(key)
    }

    pub fn owners(&self) -> impl Iterator<Item = (&OwnerId, &Arc<EntityMap<K, E>>)> {
        self.owners.iter()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Copy of `self` with `owner` bound to `items`.
    fn with_owner(&self, owner: OwnerId, items: EntityMap<K, E>) -> Self {
        let mut owners = (*self.owners).clone();
        owners.insert(owner, Arc::new(items));
        Self {
            owners: Arc::new(owners),
        }
    }

    /// The owner's current entities, cloned for modification.
    fn entities_of(&self, owner: &OwnerId) -> EntityMap<K, E> {
        self.owners
            .get(owner)
            .map(|items| (**items).clone())
            .unwrap_or_default()
    }
}

impl<K: Ord + Clone, E: Clone> Reducer for KeyedItems<K, E> {
    type Action = ItemsEvent<K, E>;

    fn reduce(&self, action: Self::Action) -> Self {
        match action {
            ItemsEvent::Replace { owner, items } => self.with_owner(owner, items),
            ItemsEvent::Merge { owner, items } => {
                let mut merged = self.entities_of(&owner);
                merged.extend(items);
                self.with_owner(owner, merged)
            }
            ItemsEvent::Upsert { owner, key, entity } => {
                let mut entities = self.entities_of(&owner);
                entities.insert(key, entity);
                self.with_owner(owner, entities)
            }
            ItemsEvent::Patch { owner, key, entity } => {
                let Some(existing) = self.owners.get(&owner) else {
                    tracing::debug!(%owner, "patch for unknown owner ignored");
                    return self.clone();
                };
                let mut entities = (**existing).clone();
                entities.insert(key, entity);
                self.with_owner(owner, entities)
            }
        }
    }
}
