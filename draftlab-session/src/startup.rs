//! Startup protocol and reset.
//!
//! With a usable snapshot in the store the caller's decision function picks
//! between resuming it and discarding it. Without one (or after a discard)
//! the catalog is loaded fresh and snapshotted immediately.

use chrono::{DateTime, Utc};
use draftlab_core::store::{self, Restored, SnapshotStore, StoreError};
use draftlab_core::{Applied, AuctionEngine, InvariantViolation, LoadError};
use thiserror::Error;

use crate::feeds::CatalogSource;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("catalog produced an invalid auction: {0}")]
    Invalid(#[from] InvariantViolation),
}

/// What the operator is shown before choosing to restore or discard.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSummary {
    pub saved_at: Option<DateTime<Utc>>,
    pub sold: usize,
    pub total: usize,
    pub current_index: usize,
    pub teams: usize,
}

impl SnapshotSummary {
    fn of(restored: &Restored) -> Self {
        let state = &restored.state;
        Self {
            saved_at: restored.saved_at,
            sold: state.sold_count(),
            total: state.players.len(),
            current_index: state.current_index,
            teams: state.captains.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    Restore,
    Discard,
}

/// How the session came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// No usable snapshot existed.
    Fresh,
    Restored,
    /// A snapshot existed and the operator threw it away.
    Discarded,
}

/// An engine plus the catalog source it resets from.
pub struct Session {
    engine: AuctionEngine,
    source: CatalogSource,
    mode: StartMode,
    startup_warning: Option<StoreError>,
}

impl Session {
    /// Run the startup protocol against `store`.
    pub fn open<S, F>(mut store: S, source: CatalogSource, decide: F) -> Result<Self, SessionError>
    where
        S: SnapshotStore + 'static,
        F: FnOnce(&SnapshotSummary) -> StartChoice,
    {
        let mut mode = StartMode::Fresh;
        let mut startup_warning = None;

        if let Some(restored) = store::load(&store) {
            let summary = SnapshotSummary::of(&restored);
            match decide(&summary) {
                StartChoice::Restore => {
                    tracing::info!(
                        location = %store.location(),
                        sold = summary.sold,
                        total = summary.total,
                        cursor = summary.current_index,
                        "restored auction from snapshot"
                    );
                    let engine = AuctionEngine::new(restored.state, store)?;
                    return Ok(Self {
                        engine,
                        source,
                        mode: StartMode::Restored,
                        startup_warning: None,
                    });
                }
                StartChoice::Discard => {
                    mode = StartMode::Discarded;
                    if let Err(e) = store::clear(&mut store) {
                        tracing::warn!(error = %e, "failed to clear discarded snapshot");
                        startup_warning = Some(e);
                    }
                }
            }
        }

        let catalog = source.load()?;
        let mut engine = AuctionEngine::new(catalog.build_state(), store)?;
        if let Some(e) = engine.snapshot() {
            startup_warning = Some(e);
        }
        tracing::info!(
            players = engine.state().players.len(),
            captains = engine.state().captains.len(),
            discarded = mode == StartMode::Discarded,
            "started fresh auction"
        );

        Ok(Self {
            engine,
            source,
            mode,
            startup_warning,
        })
    }

    /// Resume any usable snapshot, otherwise start fresh.
    pub fn resume<S>(store: S, source: CatalogSource) -> Result<Self, SessionError>
    where
        S: SnapshotStore + 'static,
    {
        Self::open(store, source, |_| StartChoice::Restore)
    }

    pub fn engine(&self) -> &AuctionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AuctionEngine {
        &mut self.engine
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn mode(&self) -> StartMode {
        self.mode
    }

    /// Set when the initial clear or snapshot failed.
    pub fn startup_warning(&self) -> Option<&StoreError> {
        self.startup_warning.as_ref()
    }

    /// Throw away all progress and start over from the catalog source.
    ///
    /// The feeds are read before anything is cleared, so a feed failure
    /// leaves the running auction and its snapshot in place.
    pub fn reset(&mut self) -> Result<Applied<()>, SessionError> {
        let catalog = self.source.load()?;
        Ok(self.engine.reset(catalog.build_state())?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    use draftlab_core::MemoryStore;

    use super::*;

    fn write_feeds(dir: &Path) -> CatalogSource {
        let p = dir.join("players.json");
        let c = dir.join("captains.json");
        let g = dir.join("config.json");
        fs::write(
            &p,
            r#"{"players":[{"name":"P1","position":"FW","rating":90},{"name":"P2","position":"MF","rating":80}]}"#,
        )
        .unwrap();
        fs::write(&c, r#"{"captains":[{"name":"A","teamName":"Reds"}]}"#).unwrap();
        fs::write(&g, r#"{"teamSize":3,"initialBudget":100}"#).unwrap();
        CatalogSource::new(
            p.to_str().unwrap(),
            c.to_str().unwrap(),
            g.to_str().unwrap(),
        )
    }

    #[test]
    fn empty_store_starts_fresh_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let asked = Cell::new(false);
        let session = Session::open(store.clone(), write_feeds(dir.path()), |_| {
            asked.set(true);
            StartChoice::Restore
        })
        .unwrap();

        assert!(!asked.get());
        assert_eq!(session.mode(), StartMode::Fresh);
        assert_eq!(store.write_count(), 1);
        assert!(session.startup_warning().is_none());
    }

    #[test]
    fn summary_describes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_feeds(dir.path());
        let store = MemoryStore::new();
        {
            let mut session = Session::resume(store.clone(), source.clone()).unwrap();
            session.engine_mut().award(0, 10).unwrap();
            session.engine_mut().advance_to_next();
        }

        let mut seen = None;
        Session::open(store, source, |summary| {
            seen = Some(summary.clone());
            StartChoice::Restore
        })
        .unwrap();
        let seen = seen.unwrap();
        assert_eq!((seen.sold, seen.total, seen.current_index), (1, 2, 1));
        assert!(seen.saved_at.is_some());
    }

    #[test]
    fn reset_keeps_state_when_feeds_are_gone() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_feeds(dir.path());
        let store = MemoryStore::new();
        let mut session = Session::resume(store.clone(), source).unwrap();
        session.engine_mut().award(0, 10).unwrap();

        fs::remove_file(dir.path().join("players.json")).unwrap();
        assert!(matches!(session.reset(), Err(SessionError::Load(_))));
        assert!(session.engine().state().players[0].sold);
        assert!(store::load(&store).unwrap().state.players[0].sold);
    }

    #[test]
    fn missing_feed_creates_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogSource::new(
            dir.path().join("nope.json").to_str().unwrap(),
            "c.json",
            "g.json",
        );
        let store = MemoryStore::new();
        assert!(matches!(
            Session::resume(store.clone(), source),
            Err(SessionError::Load(LoadError::Unreadable { .. }))
        ));
        assert_eq!(store.write_count(), 0);
    }
}
