// ── Normalized per-site state ──
//
// Immutable keyed stores, the per-feature combinator that composes
// them, and a dispatcher that serializes actions onto a watch channel.

mod dispatch;
mod items;
mod requesting;
mod saving;
mod slice;

pub use dispatch::Store;
pub use items::{EntityMap, ItemsEvent, KeyedItems};
pub use requesting::{RequestEvent, RequestStatus, RequestTracker};
pub use saving::{SaveEvent, SavePhase, SaveStatus, SaveTracker};
pub use slice::SiteSlice;
