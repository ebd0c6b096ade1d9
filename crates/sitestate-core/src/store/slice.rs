// ── Per-feature site slice ──
//
// The combinator every feature instantiates: items + requesting +
// saving, driven by the feature's own action vocabulary through
// `Feature::route`.

use std::fmt;

use serde::Serialize;

use super::{KeyedItems, RequestTracker, SaveTracker};
use crate::reducer::{Feature, Reducer};

/// State tree for one feature area.
///
/// Only `Serialize` is derived: restoring goes through
/// [`Persist`](crate::persist::Persist), which validates first.
#[derive(Serialize)]
#[serde(bound(serialize = ""))]
pub struct SiteSlice<F: Feature> {
    pub items: KeyedItems<F::Key, F::Entity>,
    pub requesting: RequestTracker,
    pub saving: SaveTracker<F::Error>,
}

// Manual impls: deriving would demand `F: Clone + Default + ...` on the
// marker type itself.

impl<F: Feature> Clone for SiteSlice<F> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            requesting: self.requesting.clone(),
            saving: self.saving.clone(),
        }
    }
}

impl<F: Feature> Default for SiteSlice<F> {
    fn default() -> Self {
        Self {
            items: KeyedItems::default(),
            requesting: RequestTracker::default(),
            saving: SaveTracker::default(),
        }
    }
}

impl<F: Feature> PartialEq for SiteSlice<F> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.requesting == other.requesting
            && self.saving == other.saving
    }
}

impl<F: Feature> fmt::Debug for SiteSlice<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteSlice")
            .field("feature", &F::NAME)
            .field("items", &self.items)
            .field("requesting", &self.requesting)
            .field("saving", &self.saving)
            .finish()
    }
}

impl<F: Feature> SiteSlice<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: KeyedItems<F::Key, F::Entity>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}

impl<F: Feature> Reducer for SiteSlice<F> {
    type Action = F::Action;

    fn reduce(&self, action: Self::Action) -> Self {
        let route = F::route(action);
        if route.items.is_none() && route.requesting.is_none() && route.saving.is_none() {
            tracing::trace!(feature = F::NAME, "action routed nowhere");
        }

        Self {
            items: route
                .items
                .map_or_else(|| self.items.clone(), |event| self.items.reduce(event)),
            requesting: route.requesting.map_or_else(
                || self.requesting.clone(),
                |event| self.requesting.reduce(event),
            ),
            saving: route
                .saving
                .map_or_else(|| self.saving.clone(), |event| self.saving.reduce(event)),
        }
    }
}
