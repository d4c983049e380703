//! Domain types for DraftLab

pub mod captain;
pub mod config;
pub mod player;
pub mod state;

pub use captain::{BudgetLevel, Captain, RosterEntry, TeamSummary};
pub use config::{AuctionConfig, ConfigError};
pub use player::Player;
pub use state::{AuctionState, InvariantViolation, Progress};
