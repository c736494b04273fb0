//! MF-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Top-level error type for the feed renderer.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("[MF-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[MF-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[MF-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[MF-3001] document has no element with id {id:?}")]
    MissingElement { id: String },

    #[error("[MF-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MF-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },
}

impl FeedError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "MF-1001",
            Self::MissingConfig { .. } => "MF-1002",
            Self::ConfigParse { .. } => "MF-1003",
            Self::MissingElement { .. } => "MF-3001",
            Self::Io { .. } => "MF-3002",
            Self::Serialization { .. } => "MF-3101",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FeedError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
