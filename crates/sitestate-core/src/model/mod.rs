// ── Domain model ──
//
// Identifiers shared by every store, plus the opaque entities the
// built-in features keep per site.

mod entity_id;
mod zone;

pub use entity_id::{EntityId, OwnerId};
pub use zone::Zone;

/// Settings bundles are opaque: setting name -> arbitrary JSON value.
pub type Settings = std::collections::BTreeMap<String, serde_json::Value>;
