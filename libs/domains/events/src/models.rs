//! Event domain models
//!
//! An event is a unique string id plus an open set of JSON attributes. Both
//! types below serialize as one flat object: `{"id": ..., <attributes>...}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Free-form event attributes (timestamp, location fields, ...)
pub type Attributes = Map<String, Value>;

/// Whether `id` can name an event.
///
/// Ids travel as URL path segments to the search backend, so the empty
/// string and the dot segments `.` and `..` are refused.
pub fn is_valid_id(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}

/// Decoded POST payload; `id` is optional and assigned by the backend when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"name": "concert", "lat": 40.0, "lon": -73.9}))]
pub struct CreateEvent {
    /// Client-chosen id; storing under an existing id replaces that event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub attributes: Attributes,
}

impl CreateEvent {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The stored form of this payload under `id`.
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            attributes: self.attributes,
        }
    }
}

/// Stored event as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": "0193a1f2-7c4e-7d21-9b8a-2f6c1d0e4a55", "name": "concert", "lat": 40.0, "lon": -73.9}))]
pub struct Event {
    pub id: String,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub attributes: Attributes,
}

impl Event {
    /// Build an event from a stored document, dropping any `id` key the
    /// document itself carries so the serialized form has exactly one.
    pub fn from_source(id: impl Into<String>, mut source: Attributes) -> Self {
        source.remove("id");
        Self {
            id: id.into(),
            attributes: source,
        }
    }
}
