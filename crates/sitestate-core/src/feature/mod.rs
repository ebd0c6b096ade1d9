// ── Feature areas ──
//
// Each feature is a marker type implementing `Feature`, which supplies
// the key/entity/error types and translates the feature's actions into
// sub-store events.

mod super_cache;
mod zoninator;

pub use super_cache::{CacheAction, PRELOADING_FIELD, SuperCache, SuperCacheState, settings_from};
pub use zoninator::{ZoneAction, Zoninator, ZonesState};
