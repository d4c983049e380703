//! AuctionState: the aggregate that is persisted as one unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::captain::{Captain, TeamSummary};
use super::config::{AuctionConfig, ConfigError};
use super::player::Player;

/// A data-model invariant that does not hold.
///
/// The engine never produces these; they show up when state arrives from
/// outside (a restored snapshot) and is checked before use.
#[derive(Debug, Error, PartialEq)]
pub enum InvariantViolation {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cursor {index} is out of range for {len} players")]
    CursorOutOfRange { index: usize, len: usize },

    #[error("player '{player}' has a sold flag that disagrees with its outcome fields")]
    InconsistentSale { player: String },

    #[error("captain '{captain}' has budget {budget} above initial budget {initial_budget}")]
    BudgetAboveInitial {
        captain: String,
        budget: u64,
        initial_budget: u64,
    },

    #[error("captain '{captain}' has team size {size}, above the cap of {cap}")]
    RosterOverflow {
        captain: String,
        size: usize,
        cap: usize,
    },

    #[error("captain '{captain}' spent {spent} but roster prices sum to {roster_total}")]
    LedgerMismatch {
        captain: String,
        spent: u64,
        roster_total: u64,
    },

    #[error("captain '{captain}' has roster prices that overflow when summed")]
    RosterTotalOverflow { captain: String },

    #[error("{sold} players are sold but rosters hold {rostered} entries")]
    SaleCountMismatch { sold: usize, rostered: usize },
}

/// Sold/remaining counters plus the cursor's 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: usize,
    pub sold: usize,
    pub remaining: usize,
    /// "Player N of M"; `None` for an empty catalog.
    pub position: Option<usize>,
}

/// Catalog (players) + Ledger (captains) + Config + cursor.
///
/// `current_index` is always a valid player index when `players` is
/// non-empty. Only [`crate::engine::AuctionEngine`] mutates this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionState {
    pub players: Vec<Player>,
    pub captains: Vec<Captain>,
    pub config: AuctionConfig,
    pub current_index: usize,
}

impl AuctionState {
    pub fn new(players: Vec<Player>, captains: Vec<Captain>, config: AuctionConfig) -> Self {
        Self {
            players,
            captains,
            config,
            current_index: 0,
        }
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_index)
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn captain(&self, index: usize) -> Option<&Captain> {
        self.captains.get(index)
    }

    pub fn sold_count(&self) -> usize {
        self.players.iter().filter(|p| p.sold).count()
    }

    /// Every player has been awarded.
    pub fn is_complete(&self) -> bool {
        self.players.iter().all(|p| p.sold)
    }

    pub fn progress(&self) -> Progress {
        let sold = self.sold_count();
        Progress {
            total: self.players.len(),
            sold,
            remaining: self.players.len() - sold,
            position: (!self.players.is_empty()).then_some(self.current_index + 1),
        }
    }

    pub fn team_summaries(&self) -> Vec<TeamSummary> {
        self.captains
            .iter()
            .map(|c| c.summary(self.config.team_size))
            .collect()
    }

    /// Case-insensitive lookup by captain name or team name.
    pub fn find_captain(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        self.captains.iter().position(|c| {
            c.name.eq_ignore_ascii_case(query) || c.team_name.eq_ignore_ascii_case(query)
        })
    }

    /// The non-full captain with the largest budget. Ties go to the earliest
    /// captain in ledger order.
    pub fn best_eligible_captain(&self) -> Option<usize> {
        let cap = self.config.team_size;
        let mut best: Option<(usize, u64)> = None;
        for (i, c) in self.captains.iter().enumerate() {
            if c.is_full(cap) {
                continue;
            }
            match best {
                Some((_, budget)) if c.budget <= budget => {}
                _ => best = Some((i, c.budget)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Check every data-model invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.config.validate()?;

        if !self.players.is_empty() && self.current_index >= self.players.len() {
            return Err(InvariantViolation::CursorOutOfRange {
                index: self.current_index,
                len: self.players.len(),
            });
        }

        if let Some(p) = self.players.iter().find(|p| !p.is_consistent()) {
            return Err(InvariantViolation::InconsistentSale {
                player: p.name.clone(),
            });
        }

        let mut rostered = 0;
        for c in &self.captains {
            if c.budget > c.initial_budget {
                return Err(InvariantViolation::BudgetAboveInitial {
                    captain: c.name.clone(),
                    budget: c.budget,
                    initial_budget: c.initial_budget,
                });
            }
            if c.team_size() > self.config.team_size {
                return Err(InvariantViolation::RosterOverflow {
                    captain: c.name.clone(),
                    size: c.team_size(),
                    cap: self.config.team_size,
                });
            }
            let roster_total = c
                .roster
                .iter()
                .try_fold(0u64, |acc, r| acc.checked_add(r.price))
                .ok_or_else(|| InvariantViolation::RosterTotalOverflow {
                    captain: c.name.clone(),
                })?;
            if roster_total != c.spent() {
                return Err(InvariantViolation::LedgerMismatch {
                    captain: c.name.clone(),
                    spent: c.spent(),
                    roster_total,
                });
            }
            rostered += c.roster.len();
        }

        let sold = self.sold_count();
        if sold != rostered {
            return Err(InvariantViolation::SaleCountMismatch { sold, rostered });
        }

        Ok(())
    }
}
