#![forbid(unsafe_code)]

//! Material Feed (mfeed) — renders a static JSON feed of material news events.
//!
//! One linear pipeline:
//! 1. **Fetch & validate** — a single request for the feed; anything that is
//!    not a non-empty JSON array shows a placeholder
//! 2. **Format** — each record becomes one line with defaults for absent
//!    fields and a five-segment confidence glyph
//! 3. **Reduce** — the latest `updated_at` across the feed goes to the
//!    status element
//!
//! # Library usage
//!
//! ```rust,no_run
//! use material_feed::prelude::*;
//!
//! let config = Config::default();
//! let mut doc = Document::page(&config.view.title, &config.view.ids());
//! let mut sink = StderrSink::default();
//! let outcome = FeedRenderer::from_config(&config).render(&mut doc, &mut sink)?;
//! println!("{}: {}", outcome.label(), doc.to_lines().join("\n"));
//! # Ok::<(), FeedError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod feed;
pub mod logger;
pub mod render;
pub mod view;
