// sitestate-core: Per-site normalized state reducers with snapshot validation.

pub mod error;
pub mod feature;
pub mod model;
pub mod persist;
pub mod reducer;
pub mod root;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use persist::{DropReason, Dropped, Persist, RestoreReport};
pub use reducer::{Feature, Reducer, Route};
pub use root::{Action, RootState, parse_actions};
pub use store::{
    EntityMap, ItemsEvent, KeyedItems, RequestEvent, RequestStatus, RequestTracker, SaveEvent,
    SavePhase, SaveStatus, SaveTracker, SiteSlice, Store,
};
pub use stream::{StateStream, StateWatchStream};

// Re-export model and feature types at the crate root for ergonomics.
pub use feature::{CacheAction, SuperCache, SuperCacheState, ZoneAction, Zoninator, ZonesState};
pub use model::{EntityId, OwnerId, Settings, Zone};
