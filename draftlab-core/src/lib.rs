//! DraftLab Core: domain types, catalog construction, auction engine, snapshots.
//!
//! This crate contains the auction transaction engine:
//! - Domain types (players, captains, roster entries, auction config)
//! - Fresh-start construction from the player/captain/config feeds
//! - The award transaction and cursor navigation, with a snapshot after
//!   every mutation
//! - Snapshot stores (file and in-memory) and the restore path

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod format;
pub mod store;

pub use catalog::{CaptainDef, Catalog, Feed, LoadError, PlayerDef};
pub use domain::{
    AuctionConfig, AuctionState, BudgetLevel, Captain, InvariantViolation, Player, Progress,
    RosterEntry, TeamSummary,
};
pub use engine::{Advance, Applied, AuctionEngine, AuctionError, AwardReceipt, Reference};
pub use store::{FileStore, MemoryStore, Restored, SnapshotStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain types can cross threads, and the engine
    /// can be moved onto a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Player>();
        require_sync::<Player>();
        require_send::<Captain>();
        require_sync::<Captain>();
        require_send::<AuctionState>();
        require_sync::<AuctionState>();
        require_send::<Catalog>();
        require_sync::<Catalog>();
        require_send::<AuctionError>();
        require_sync::<AuctionError>();
        require_send::<StoreError>();
        require_sync::<StoreError>();
        require_send::<MemoryStore>();
        require_sync::<MemoryStore>();
        require_send::<FileStore>();
        require_sync::<FileStore>();

        require_send::<AuctionEngine>();
    }

    /// Architecture contract: the only `&mut AuctionState` lives inside the
    /// engine. Readers get a shared reference.
    #[test]
    fn engine_exposes_read_only_state() {
        fn _check(engine: &AuctionEngine) -> &AuctionState {
            engine.state()
        }
    }
}
