//! Session configuration (`draftlab.toml`).
//!
//! Every key is optional. A missing file section falls back to defaults, so
//! an empty file is a valid config.

use std::fs;
use std::path::{Path, PathBuf};

use draftlab_core::store::{FileStore, DEFAULT_STORE_KEY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feeds::CatalogSource;

/// Smallest report page that still fits a team header block.
pub const MIN_REPORT_PAGE_LINES: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Log filter used when `RUST_LOG` is not set (e.g. "info", "draftlab_core=debug").
    pub log_level: Option<String>,
    pub data: DataConfig,
    pub store: StoreConfig,
    pub session: SessionSettings,
}

/// Where the three catalog feeds live. Each entry is a path or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub players: String,
    pub captains: String,
    pub config: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            players: "data/players.json".into(),
            captains: "data/captains.json".into(),
            config: "data/config.json".into(),
        }
    }
}

/// Snapshot slot location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the snapshot. Defaults to the platform data dir.
    pub dir: Option<PathBuf>,
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_STORE_KEY.into(),
        }
    }
}

impl StoreConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("draftlab")
        })
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.resolved_dir(), self.key.clone())
    }
}

/// Operator-facing session behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// After an award, move to the next unsold player.
    pub auto_advance: bool,
    /// Lines per page in the printable report.
    pub report_page_lines: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            report_page_lines: 48,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.key.trim().is_empty() {
            return Err(ConfigError::Invalid("store.key must not be empty".into()));
        }
        if self.store.key.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "store.key '{}' must not contain path separators",
                self.store.key
            )));
        }
        if self.session.report_page_lines < MIN_REPORT_PAGE_LINES {
            return Err(ConfigError::Invalid(format!(
                "session.report_page_lines must be at least {MIN_REPORT_PAGE_LINES}, got {}",
                self.session.report_page_lines
            )));
        }
        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::new(&self.data.players, &self.data.captains, &self.data.config)
    }
}

/// Returns a default configuration string for documentation.
pub fn default_config_template() -> &'static str {
    r#"# DraftLab session configuration
#
# All keys are optional. Feed entries accept a file path or an http(s) URL.

# Log filter used when RUST_LOG is not set.
log_level = "info"

[data]
players = "data/players.json"
captains = "data/captains.json"
config = "data/config.json"

[store]
# Snapshot directory (defaults to the platform data directory + "/draftlab").
# dir = ".draftlab"
key = "football-auction-state"

[session]
# Jump to the next unsold player after each award.
auto_advance = true
# Lines per page in the printable team report.
report_page_lines = 48
"#
}
