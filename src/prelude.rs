//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use material_feed::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{FeedError, Result};

// Feed
pub use crate::feed::format::{RecordFormatter, latest_update};
pub use crate::feed::glyph::{GlyphStyle, confidence_glyph};
pub use crate::feed::load::{FeedLoad, parse_feed};
pub use crate::feed::record::{EventRecord, SourceRef};
pub use crate::feed::source::{FeedSource, FetchError};

// Rendering
pub use crate::logger::jsonl::{DiagnosticSink, JsonlSink, MemorySink, StderrSink};
pub use crate::render::{FeedRenderer, RenderOutcome};
pub use crate::view::{Document, Element, ViewIds};
