//! Feed shape validation.

use serde_json::Value;

use crate::feed::record::EventRecord;
use crate::feed::source::FetchError;

/// Result of decoding a feed body.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedLoad {
    /// Non-empty array, in feed order.
    Events(Vec<EventRecord>),
    /// Empty array, or JSON that is not an array at all.
    Empty,
}

impl FeedLoad {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Events(records) => records.len(),
            Self::Empty => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Decode a raw feed body.
///
/// Undecodable bytes are a fetch failure. A decodable body with the wrong
/// shape is not: it is reported as [`FeedLoad::Empty`].
pub fn parse_feed(body: &[u8]) -> Result<FeedLoad, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(|error| FetchError::Decode {
        details: error.to_string(),
    })?;
    Ok(from_value(&value))
}

/// Validate an already-decoded JSON document.
#[must_use]
pub fn from_value(value: &Value) -> FeedLoad {
    match value.as_array() {
        Some(entries) if !entries.is_empty() => {
            FeedLoad::Events(entries.iter().map(EventRecord::from_value).collect())
        }
        _ => FeedLoad::Empty,
    }
}
