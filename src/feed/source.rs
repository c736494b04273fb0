//! Feed transport: one attempt to pull the raw feed body.
//!
//! HTTP(S) sources go through a blocking `reqwest` client; `file://` URLs and
//! plain paths are read from disk. There are no retries and no timeout beyond
//! the transport's own default.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to obtain a decodable feed body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("[MF-2001] {origin} answered with HTTP status {status}")]
    Status { origin: String, status: u16 },

    #[error("[MF-2002] transport failure for {origin}: {details}")]
    Transport { origin: String, details: String },

    #[error("[MF-2003] feed body is not valid JSON: {details}")]
    Decode { details: String },

    #[error("[MF-2004] cannot read feed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "MF-2001",
            Self::Transport { .. } => "MF-2002",
            Self::Decode { .. } => "MF-2003",
            Self::Io { .. } => "MF-2004",
        }
    }

    /// HTTP status for non-success responses.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Where the feed lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// `http://` or `https://` URL.
    Http(String),
    /// Local file, already resolved against the base directory.
    File(PathBuf),
}

impl FeedSource {
    /// Interpret `raw` as a URL or path.
    ///
    /// Relative paths resolve against `base_dir` (the directory of the host
    /// page) when given, else against the current directory.
    #[must_use]
    pub fn parse(raw: &str, base_dir: Option<&Path>) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Self::Http(raw.to_string());
        }

        let path = PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw));
        match base_dir {
            Some(base) if path.is_relative() => Self::File(base.join(path)),
            _ => Self::File(path),
        }
    }

    /// Fetch the raw body in a single attempt.
    pub fn fetch(&self, user_agent: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            Self::Http(url) => fetch_http(url, user_agent),
            Self::File(path) => fs::read(path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_http(url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
    let transport = |error: reqwest::Error| FetchError::Transport {
        origin: url.to_string(),
        details: error.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(transport)?;
    let response = client.get(url).send().map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            origin: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(transport)?;
    Ok(body.to_vec())
}
