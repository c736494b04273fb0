//! Record formatting and the last-updated reduction.

use crate::feed::glyph::{GlyphStyle, confidence_glyph};
use crate::feed::record::EventRecord;

/// Shown when a record has no usable `when_utc`.
pub const WHEN_FALLBACK: &str = "n/a";
/// Shown when a record has no usable `location.name`.
pub const PLACE_FALLBACK: &str = "Unknown location";
/// Shown in the status element when no record carries `updated_at`.
pub const LAST_UPDATED_FALLBACK: &str = "unknown";

/// Separator between the time, place, and headline columns.
const COLUMN_SEPARATOR: &str = " — ";
const SOURCE_SEPARATOR: &str = ", ";

/// Formats records into display lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormatter {
    style: GlyphStyle,
}

impl RecordFormatter {
    #[must_use]
    pub const fn new(style: GlyphStyle) -> Self {
        Self { style }
    }

    /// `{when} — {place} — {headline} Sources: {sources} {glyph}`
    #[must_use]
    pub fn format(&self, record: &EventRecord) -> String {
        let when = non_empty(record.when_utc.as_deref()).unwrap_or(WHEN_FALLBACK);
        let place = non_empty(record.location_name.as_deref()).unwrap_or(PLACE_FALLBACK);
        let headline = record.headline.as_deref().unwrap_or_default();
        let sources = record
            .source_names()
            .collect::<Vec<_>>()
            .join(SOURCE_SEPARATOR);
        let glyph = confidence_glyph(record.confidence.unwrap_or(0.0), self.style);

        format!(
            "{when}{COLUMN_SEPARATOR}{place}{COLUMN_SEPARATOR}{headline} Sources: {sources} {glyph}"
        )
    }
}

/// Lexically greatest non-empty `updated_at` across `records`.
///
/// Records without the field are skipped. The feed writes fixed-width
/// ISO-8601 UTC stamps, so text order is time order.
#[must_use]
pub fn latest_update(records: &[EventRecord]) -> Option<&str> {
    records
        .iter()
        .filter_map(|record| non_empty(record.updated_at.as_deref()))
        .max()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
