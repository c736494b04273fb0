//! Render diagnostics: structured JSONL file sink plus stderr and in-memory sinks.

pub mod jsonl;
