//! Event records: the optional-field view of one feed entry.
//!
//! The feed is produced by an external batch job and nothing about its shape
//! is trusted. Records are built from raw JSON values at the boundary; a field
//! holding the wrong JSON type is treated exactly like a missing field, so a
//! malformed record degrades to defaults instead of failing the whole feed.

use serde_json::{Map, Value};

/// One source citation attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRef {
    /// Outlet name, e.g. "Reuters". `None` when missing or not text.
    pub name: Option<String>,
}

/// One event entry from the feed. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    pub when_utc: Option<String>,
    /// `location.name` from the feed.
    pub location_name: Option<String>,
    pub headline: Option<String>,
    /// `None` when the feed entry has no `sources` array.
    pub sources: Option<Vec<SourceRef>>,
    /// Present-vs-absent matters here: an explicit `0` is kept as `Some(0.0)`.
    pub confidence: Option<f64>,
    pub updated_at: Option<String>,
}

impl EventRecord {
    /// Build a record from one element of the feed array.
    ///
    /// Non-object elements yield an all-defaults record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            when_utc: text_field(obj, "when_utc"),
            location_name: obj
                .get("location")
                .and_then(Value::as_object)
                .and_then(|location| text_field(location, "name")),
            headline: text_field(obj, "headline"),
            sources: obj.get("sources").and_then(Value::as_array).map(|entries| {
                entries
                    .iter()
                    .map(|entry| SourceRef {
                        name: entry.as_object().and_then(|s| text_field(s, "name")),
                    })
                    .collect()
            }),
            confidence: confidence_field(obj),
            updated_at: text_field(obj, "updated_at"),
        }
    }

    /// Names of the sources that carry one, in feed order.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .flatten()
            .filter_map(|source| source.name.as_deref())
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

// `null` counts as present and numerically zero; other non-numbers are absent.
fn confidence_field(obj: &Map<String, Value>) -> Option<f64> {
    match obj.get("confidence")? {
        Value::Null => Some(0.0),
        other => other.as_f64(),
    }
}
