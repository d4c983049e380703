//! Snapshot persistence.
//!
//! The whole [`AuctionState`] is written as one JSON document to a single
//! named slot, overwritten wholesale on every save:
//!
//! ```json
//! {"players": [...], "captains": [...], "config": {...},
//!  "currentIndex": 0, "timestamp": "2024-05-01T18:30:00Z"}
//! ```
//!
//! Loading is forgiving: a missing, unreadable or malformed snapshot is
//! logged and reported as absent so startup falls back to a fresh load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AuctionConfig, AuctionState, Captain, Player};

/// Slot name used when none is configured.
pub const DEFAULT_STORE_KEY: &str = "football-auction-state";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Durability is degraded; in-memory state is unaffected.
    #[error("failed to write snapshot to {location}: {reason}")]
    Write { location: String, reason: String },

    #[error("failed to read snapshot from {location}: {reason}")]
    Read { location: String, reason: String },

    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("failed to remove snapshot at {location}: {reason}")]
    Remove { location: String, reason: String },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),
}

/// A durable single-slot key-value store.
pub trait SnapshotStore: Send {
    /// Current slot contents, `None` when nothing has been saved.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents.
    fn write(&mut self, contents: &str) -> Result<(), StoreError>;

    /// Empty the slot. Removing an empty slot is not an error.
    fn remove(&mut self) -> Result<(), StoreError>;

    /// Human-readable location, for logs and operator messages.
    fn location(&self) -> String;
}

// ── Snapshot document ───────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotOut<'a> {
    players: &'a [Player],
    captains: &'a [Captain],
    config: &'a AuctionConfig,
    current_index: usize,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotIn {
    players: Vec<Player>,
    captains: Vec<Captain>,
    config: AuctionConfig,
    #[serde(default)]
    current_index: Option<usize>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// A decoded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub state: AuctionState,
    /// When the snapshot was written, if it recorded a timestamp.
    pub saved_at: Option<DateTime<Utc>>,
}

/// Serialize `state` with the given save timestamp.
pub fn encode(state: &AuctionState, timestamp: DateTime<Utc>) -> Result<String, StoreError> {
    let doc = SnapshotOut {
        players: &state.players,
        captains: &state.captains,
        config: &state.config,
        current_index: state.current_index,
        timestamp,
    };
    serde_json::to_string(&doc).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Parse and validate a snapshot document.
///
/// A present `currentIndex` (including `0`) is used verbatim. An absent one
/// restores at the first player.
pub fn decode(contents: &str) -> Result<Restored, StoreError> {
    let doc: SnapshotIn =
        serde_json::from_str(contents).map_err(|e| StoreError::Malformed(e.to_string()))?;

    let current_index = match doc.current_index {
        Some(index) => index,
        None => {
            tracing::warn!("snapshot has no currentIndex; restoring at the first player");
            0
        }
    };

    let state = AuctionState {
        players: doc.players,
        captains: doc.captains,
        config: doc.config,
        current_index,
    };
    state
        .check_invariants()
        .map_err(|e| StoreError::Malformed(e.to_string()))?;

    Ok(Restored {
        state,
        saved_at: doc.timestamp,
    })
}

/// Write a full snapshot of `state`. Returns the recorded timestamp.
pub fn save(store: &mut dyn SnapshotStore, state: &AuctionState) -> Result<DateTime<Utc>, StoreError> {
    let timestamp = Utc::now();
    let json = encode(state, timestamp)?;
    store.write(&json)?;
    tracing::trace!(location = %store.location(), "snapshot saved");
    Ok(timestamp)
}

/// Load the stored snapshot, if there is a usable one.
///
/// Read failures and malformed documents are logged and reported as absent.
pub fn load(store: &dyn SnapshotStore) -> Option<Restored> {
    let contents = match store.read() {
        Ok(Some(contents)) => contents,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable snapshot");
            return None;
        }
    };
    match decode(&contents) {
        Ok(restored) => Some(restored),
        Err(e) => {
            tracing::warn!(location = %store.location(), error = %e, "ignoring malformed snapshot");
            None
        }
    }
}

/// Remove the stored snapshot.
pub fn clear(store: &mut dyn SnapshotStore) -> Result<(), StoreError> {
    store.remove()?;
    tracing::info!(location = %store.location(), "snapshot cleared");
    Ok(())
}

// ── File store ──────────────────────────────────────────────────────

/// One JSON file per key: `{dir}/{key}.json`.
///
/// Writes are atomic: write to `.tmp`, then rename into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path()) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                location: self.location(),
                reason: e.to_string(),
            }),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        let write_err = |e: io::Error| StoreError::Write {
            location: self.location(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let path = self.path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(write_err)?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            write_err(e)
        })
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Remove {
                location: self.location(),
                reason: e.to_string(),
            }),
        }
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}

// ── Memory store ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemorySlot {
    contents: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-process store. Clones share the same slot, so a caller can keep a
/// handle for inspection after moving a clone into an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().contents = Some(contents.into());
        store
    }

    /// Make every subsequent write fail (simulates a full or locked disk).
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(StoreError::Write {
                location: "memory".into(),
                reason: "store is rejecting writes".into(),
            });
        }
        slot.contents = Some(contents.to_string());
        slot.writes += 1;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.lock().contents = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}
