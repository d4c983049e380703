//! DraftLab Session: everything around the engine for one auction night.
//!
//! - Session configuration (`draftlab.toml`)
//! - Catalog feeds from local files or HTTP
//! - Startup protocol: restore or discard a saved snapshot, then reset
//! - Team exports: JSON, CSV and a printable text report

pub mod config;
pub mod export;
pub mod feeds;
pub mod startup;

pub use config::{default_config_template, ConfigError, SessionConfig};
pub use export::{export_csv, export_json, export_report, save_export, ExportFormat, TeamExport};
pub use feeds::{CatalogSource, FeedSource};
pub use startup::{Session, SessionError, SnapshotSummary, StartChoice, StartMode};
