// ── Core error types ──
//
// Reducers never fail: unknown actions are the identity and malformed
// snapshots are filtered. What remains are the edges where state turns
// into JSON or JSON into actions.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid action at {location}: {source}")]
    InvalidAction {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Action stream must be a JSON array or JSON lines, found {found}")]
    ActionStreamShape { found: String },
}
