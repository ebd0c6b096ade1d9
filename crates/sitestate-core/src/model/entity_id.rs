// ── Core identity types ──
//
// EntityId keys every level of the state tree: sites at the top,
// entities (zones, settings) underneath. JSON object keys are always
// strings, so the serde impls accept both numbers and strings and
// normalize canonical decimal strings back to numeric ids.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for a site or an entity within a site.
///
/// Numeric ids come from the hosting API; named ids cover slugs and
/// anything else that isn't a plain integer. Numeric ids sort before
/// named ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Numeric(u64),
    Named(String),
}

/// Identifier of the site (tenant) a sub-collection belongs to.
pub type OwnerId = EntityId;

impl EntityId {
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(s) => Some(s),
            Self::Numeric(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Named(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        // Only the canonical decimal form becomes numeric, so "0123"
        // survives a round-trip as the same string.
        match s.parse::<u64>() {
            Ok(n) if n.to_string() == s => Self::Numeric(n),
            _ => Self::Named(s.to_owned()),
        }
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Numeric(n) => Self::Numeric(n),
            Self::Named(_) => Self::Named(s),
        }
    }
}

impl From<EntityId> for serde_json::Value {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::Numeric(n) => Self::from(n),
            EntityId::Named(s) => Self::String(s),
        }
    }
}

// ── Serde ───────────────────────────────────────────────────────────

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(n) => serializer.serialize_u64(*n),
            Self::Named(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

struct EntityIdVisitor;

impl Visitor<'_> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string identifier")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EntityId::Numeric(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(EntityId::Numeric)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }
}
