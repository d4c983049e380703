use std::fmt;

use thiserror::Error;

/// What an out-of-range index pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Player,
    Captain,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Player => write!(f, "player"),
            Reference::Captain => write!(f, "captain"),
        }
    }
}

/// Rejected award or navigation. A rejected operation never changes state.
///
/// Everything except `InvalidReference` is recoverable by the operator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuctionError {
    #[error("no {kind} at index {index} ({len} available)")]
    InvalidReference {
        kind: Reference,
        index: usize,
        len: usize,
    },

    #[error("{player} has already been awarded")]
    AlreadyAwarded { player: String },

    #[error("{team} is full")]
    RosterFull { team: String },

    #[error("invalid bid '{entry}': enter a whole non-negative amount")]
    InvalidBid { entry: String },

    #[error("insufficient budget: {team} has {budget}, bid was {amount}")]
    InsufficientBudget {
        team: String,
        budget: u64,
        amount: u64,
    },

    #[error("every team is full")]
    NoEligibleCaptain,
}

impl AuctionError {
    /// False only for caller bugs (bad indices).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AuctionError::InvalidReference { .. })
    }
}
