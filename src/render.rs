//! The render pass: fetch → validate → format each record → write to the view.
//!
//! One entry point, [`FeedRenderer::render`]. Feed-level failures never escape
//! as errors: they are logged to the diagnostic sink and shown in the
//! container as a generic message. The only hard error is a document with no
//! container element, since there is nowhere to show anything.

use crate::core::config::Config;
use crate::core::errors::{FeedError, Result};
use crate::feed::format::{LAST_UPDATED_FALLBACK, RecordFormatter, latest_update};
use crate::feed::load::{FeedLoad, parse_feed};
use crate::feed::source::{FeedSource, FetchError};
use crate::logger::jsonl::{DiagnosticSink, EventType, LogEntry, Severity};
use crate::view::{Document, Element, ViewIds};

/// Container text when the feed is empty or not an array.
pub const EMPTY_FEED_MESSAGE: &str = "No events available.";
/// Container text when the feed could not be fetched or decoded.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load events.";
/// Class of each line-level element appended to the container.
pub const EVENT_LINE_CLASS: &str = "event-line";

/// What a render pass ended up showing.
#[derive(Debug)]
pub enum RenderOutcome {
    /// One line per record, in feed order.
    Rendered {
        lines: Vec<String>,
        /// `None` when no record had `updated_at`.
        last_updated: Option<String>,
    },
    /// Placeholder shown; status element untouched.
    Empty,
    /// Failure message shown.
    Failed(FetchError),
}

impl RenderOutcome {
    /// Stable label for JSON output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rendered { .. } => "rendered",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Renders one feed into a document.
#[derive(Debug, Clone)]
pub struct FeedRenderer {
    source: FeedSource,
    user_agent: String,
    formatter: RecordFormatter,
    ids: ViewIds,
}

impl FeedRenderer {
    #[must_use]
    pub fn new(source: FeedSource, formatter: RecordFormatter, ids: ViewIds) -> Self {
        Self {
            source,
            user_agent: format!("mfeed/{}", env!("CARGO_PKG_VERSION")),
            formatter,
            ids,
        }
    }

    /// Renderer for the configured feed source, ids, and glyph style.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let source = FeedSource::parse(&config.feed.source, config.feed.base_dir());
        Self::new(
            source,
            RecordFormatter::new(config.view.glyph_style),
            config.view.ids(),
        )
        .with_user_agent(&config.feed.user_agent)
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub const fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch the feed once and write the result into `doc`.
    pub fn render(&self, doc: &mut Document, sink: &mut dyn DiagnosticSink) -> Result<RenderOutcome> {
        self.container(doc)?;
        sink.record(
            &LogEntry::new(EventType::RenderStart, Severity::Info)
                .with_source(self.source.to_string()),
        );

        let loaded = self
            .source
            .fetch(&self.user_agent)
            .and_then(|body| parse_feed(&body));
        match loaded {
            Ok(feed) => self.render_feed(doc, feed, sink),
            Err(error) => self.show_failure(doc, error, sink),
        }
    }

    /// Write an already-decoded feed into `doc`.
    ///
    /// The container is replaced, never appended to, so repeating a render
    /// with the same feed leaves the same document.
    pub fn render_feed(
        &self,
        doc: &mut Document,
        feed: FeedLoad,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RenderOutcome> {
        let records = match feed {
            FeedLoad::Empty => {
                self.container(doc)?.set_text(EMPTY_FEED_MESSAGE);
                sink.record(
                    &LogEntry::new(EventType::FeedEmpty, Severity::Info)
                        .with_source(self.source.to_string()),
                );
                return Ok(RenderOutcome::Empty);
            }
            FeedLoad::Events(records) => records,
        };

        let lines: Vec<String> = records
            .iter()
            .map(|record| self.formatter.format(record))
            .collect();

        let container = self.container(doc)?;
        container.clear();
        for line in &lines {
            container.append(
                Element::new("div")
                    .with_class(EVENT_LINE_CLASS)
                    .with_text(line.as_str()),
            );
        }

        let last_updated = latest_update(&records).map(str::to_owned);
        if let Some(status) = doc.element_mut(&self.ids.status) {
            status.set_text(last_updated.as_deref().unwrap_or(LAST_UPDATED_FALLBACK));
        }

        sink.record(
            &LogEntry::new(EventType::RenderComplete, Severity::Info)
                .with_source(self.source.to_string())
                .with_count(lines.len())
                .with_details(format!(
                    "last_updated={}",
                    last_updated.as_deref().unwrap_or(LAST_UPDATED_FALLBACK)
                )),
        );
        Ok(RenderOutcome::Rendered {
            lines,
            last_updated,
        })
    }

    fn show_failure(
        &self,
        doc: &mut Document,
        error: FetchError,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RenderOutcome> {
        sink.record(
            &LogEntry::new(EventType::FetchFailed, Severity::Critical)
                .with_source(self.source.to_string())
                .with_error(error.code(), error.to_string()),
        );
        self.container(doc)?.set_text(FETCH_FAILED_MESSAGE);
        Ok(RenderOutcome::Failed(error))
    }

    fn container<'d>(&self, doc: &'d mut Document) -> Result<&'d mut Element> {
        doc.element_mut(&self.ids.container)
            .ok_or_else(|| FeedError::MissingElement {
                id: self.ids.container.clone(),
            })
    }
}
