//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FeedError, Result};
use crate::feed::glyph::GlyphStyle;
use crate::view::{DEFAULT_CONTAINER_ID, DEFAULT_STATUS_ID, ViewIds};

/// Full mfeed configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub view: ViewConfig,
    pub paths: PathsConfig,
}

/// Where the feed comes from and how it is requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// URL, `file://` URL, or path of the JSON feed.
    pub source: String,
    /// Directory relative paths resolve against; empty means the current directory.
    pub base_dir: PathBuf,
    pub user_agent: String,
}

/// Host page layout and glyph rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    pub container_id: String,
    pub status_id: String,
    pub glyph_style: GlyphStyle,
}

/// Filesystem paths used by mfeed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub diagnostics_log: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: "events.json".to_string(),
            base_dir: PathBuf::new(),
            user_agent: format!("mfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: "Material News".to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            status_id: DEFAULT_STATUS_ID.to_string(),
            glyph_style: GlyphStyle::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[MFEED-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("mfeed").join("config.toml"),
            diagnostics_log: home_dir
                .join(".local")
                .join("share")
                .join("mfeed")
                .join("diagnostics.jsonl"),
        }
    }
}

impl ViewConfig {
    /// Element ids the renderer addresses.
    #[must_use]
    pub fn ids(&self) -> ViewIds {
        ViewIds {
            container: self.container_id.clone(),
            status: self.status_id.clone(),
        }
    }
}

impl FeedConfig {
    /// Base directory for relative feed paths, `None` for the current directory.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        (!self.base_dir.as_os_str().is_empty()).then_some(self.base_dir.as_path())
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| FeedError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(FeedError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for diagnostics.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // feed
        if let Some(raw) = lookup("MFEED_FEED_SOURCE") {
            self.feed.source = raw;
        }
        if let Some(raw) = lookup("MFEED_FEED_BASE_DIR") {
            self.feed.base_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("MFEED_FEED_USER_AGENT") {
            self.feed.user_agent = raw;
        }

        // view
        if let Some(raw) = lookup("MFEED_VIEW_TITLE") {
            self.view.title = raw;
        }
        if let Some(raw) = lookup("MFEED_VIEW_CONTAINER_ID") {
            self.view.container_id = raw;
        }
        if let Some(raw) = lookup("MFEED_VIEW_STATUS_ID") {
            self.view.status_id = raw;
        }
        if let Some(raw) = lookup("MFEED_VIEW_GLYPH_STYLE") {
            self.view.glyph_style =
                GlyphStyle::from_label(&raw).ok_or_else(|| FeedError::ConfigParse {
                    context: "env",
                    details: format!("MFEED_VIEW_GLYPH_STYLE={raw:?}: expected small or block"),
                })?;
        }

        // paths
        if let Some(raw) = lookup("MFEED_PATHS_DIAGNOSTICS_LOG") {
            self.paths.diagnostics_log = PathBuf::from(raw);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.feed.source.trim().is_empty() {
            return Err(FeedError::InvalidConfig {
                details: "feed.source must not be empty".to_string(),
            });
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(FeedError::InvalidConfig {
                details: "feed.user_agent must not be empty".to_string(),
            });
        }

        for (name, id) in [
            ("view.container_id", &self.view.container_id),
            ("view.status_id", &self.view.status_id),
        ] {
            validate_element_id(name, id)?;
        }
        if self.view.container_id == self.view.status_id {
            return Err(FeedError::InvalidConfig {
                details: format!(
                    "view.container_id and view.status_id must differ, both are {:?}",
                    self.view.container_id
                ),
            });
        }

        Ok(())
    }
}

fn validate_element_id(name: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(FeedError::InvalidConfig {
            details: format!("{name} must not be empty"),
        });
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(FeedError::InvalidConfig {
            details: format!("{name} contains invalid character {bad:?}; allowed: A-Z a-z 0-9 - _"),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}
