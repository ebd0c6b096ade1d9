use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A curated content zone on a site.
///
/// Held as the JSON the data layer produced. Nothing is required and
/// nothing is dropped: attributes this crate has no accessor for (term
/// ids, post lists, ...) survive restore and snapshot untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(Value);

impl Zone {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), id.into().into());
        fields.insert("name".into(), Value::String(name.into()));
        Self(Value::Object(fields))
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_field("description", Value::String(description.into()))
    }

    #[must_use]
    pub fn with_slug(self, slug: impl Into<String>) -> Self {
        self.with_field("slug", Value::String(slug.into()))
    }

    /// Set one attribute; a no-op when the zone isn't a JSON object.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(key.to_owned(), value);
        }
        self
    }

    /// The zone's own `id` attribute, when it holds a usable identifier.
    pub fn id(&self) -> Option<EntityId> {
        self.0
            .get("id")
            .and_then(|raw| EntityId::deserialize(raw).ok())
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn slug(&self) -> Option<&str> {
        self.text("slug")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for Zone {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
