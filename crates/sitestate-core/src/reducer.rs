// ── Reducer contracts ──
//
// Every store is an immutable value: `reduce` takes the prior state by
// reference and returns the next one. Features plug into the generic
// site slice by translating their own action vocabulary into the
// sub-store events via `Feature::route`.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{ItemsEvent, RequestEvent, SaveEvent};

/// A pure state transition.
///
/// Implementations must not perform I/O and must return a state equal
/// to `self` for actions they don't recognize.
pub trait Reducer: Clone + Default {
    type Action;

    fn reduce(&self, action: Self::Action) -> Self;

    /// Fold a sequence of actions, in order.
    fn reduce_all<I>(&self, actions: I) -> Self
    where
        I: IntoIterator<Item = Self::Action>,
    {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.reduce(action))
    }
}

/// Sub-store events produced by a single feature action.
///
/// One action may touch several sub-stores (a zone update both stores
/// the zone and settles the save), or none at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<K, E, Err> {
    pub items: Option<ItemsEvent<K, E>>,
    pub requesting: Option<RequestEvent>,
    pub saving: Option<SaveEvent<Err>>,
}

impl<K, E, Err> Route<K, E, Err> {
    /// A route that leaves every sub-store untouched.
    pub fn none() -> Self {
        Self {
            items: None,
            requesting: None,
            saving: None,
        }
    }

    pub fn items(event: ItemsEvent<K, E>) -> Self {
        Self {
            items: Some(event),
            ..Self::none()
        }
    }

    pub fn requesting(event: RequestEvent) -> Self {
        Self {
            requesting: Some(event),
            ..Self::none()
        }
    }

    pub fn saving(event: SaveEvent<Err>) -> Self {
        Self {
            saving: Some(event),
            ..Self::none()
        }
    }

    #[must_use]
    pub fn and_requesting(mut self, event: RequestEvent) -> Self {
        self.requesting = Some(event);
        self
    }

    #[must_use]
    pub fn and_saving(mut self, event: SaveEvent<Err>) -> Self {
        self.saving = Some(event);
        self
    }
}

/// Parameterizes the generic [`SiteSlice`](crate::store::SiteSlice) for
/// one feature area.
pub trait Feature {
    /// Name used in logs and in the persisted snapshot.
    const NAME: &'static str;

    type Key: Ord + Clone + Debug + Serialize + DeserializeOwned;
    type Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned;
    type Error: Clone + Debug + PartialEq + Serialize + DeserializeOwned;
    type Action: Debug;

    fn route(action: Self::Action) -> Route<Self::Key, Self::Entity, Self::Error>;
}
