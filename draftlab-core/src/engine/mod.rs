//! Auction engine: the single writer of [`AuctionState`].
//!
//! Every operation either fails with an [`AuctionError`] and leaves state
//! untouched, or applies completely and then writes a snapshot before
//! returning. A failed snapshot write does not undo the operation: the
//! outcome is returned together with the write error as a warning.

pub mod bid;
pub mod error;

pub use bid::parse_bid;
pub use error::{AuctionError, Reference};

use chrono::{DateTime, Utc};

use crate::domain::{AuctionState, Captain, InvariantViolation, Player};
use crate::store::{self, SnapshotStore, StoreError};

/// The outcome of an applied operation plus the snapshot write result.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub outcome: T,
    /// Set when the follow-up snapshot failed. State has still advanced.
    pub save_warning: Option<StoreError>,
}

impl<T> Applied<T> {
    pub fn is_durable(&self) -> bool {
        self.save_warning.is_none()
    }
}

/// A completed award transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardReceipt {
    pub player_index: usize,
    pub captain_index: usize,
    pub amount: u64,
    /// The player after the award.
    pub player: Player,
    /// The captain after the award.
    pub captain: Captain,
}

/// Result of [`AuctionEngine::advance_to_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: usize, to: usize },
    /// Already at the last player with nothing unsold ahead.
    Complete,
}

/// Owns the auction state and the store it snapshots to.
pub struct AuctionEngine {
    state: AuctionState,
    store: Box<dyn SnapshotStore>,
    durable: bool,
    last_saved_at: Option<DateTime<Utc>>,
}

impl AuctionEngine {
    /// Wrap existing state. The state is checked but not snapshotted; call
    /// [`AuctionEngine::snapshot`] when the caller wants an immediate save.
    pub fn new(
        state: AuctionState,
        store: impl SnapshotStore + 'static,
    ) -> Result<Self, InvariantViolation> {
        state.check_invariants()?;
        Ok(Self {
            state,
            store: Box::new(store),
            durable: true,
            last_saved_at: None,
        })
    }

    /// Read access for presentation and export.
    pub fn state(&self) -> &AuctionState {
        &self.state
    }

    pub fn into_state(self) -> AuctionState {
        self.state
    }

    /// False while the most recent snapshot write has failed.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    /// Write a snapshot of the current state.
    pub fn snapshot(&mut self) -> Option<StoreError> {
        match store::save(self.store.as_mut(), &self.state) {
            Ok(at) => {
                if !self.durable {
                    tracing::info!("snapshot writes recovered");
                }
                self.durable = true;
                self.last_saved_at = Some(at);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot failed; auction continues in memory");
                self.durable = false;
                Some(e)
            }
        }
    }

    /// Discard the stored snapshot and replace all state with `fresh`.
    pub fn reset(&mut self, fresh: AuctionState) -> Result<Applied<()>, InvariantViolation> {
        fresh.check_invariants()?;
        let clear_warning = store::clear(self.store.as_mut()).err();
        if let Some(e) = &clear_warning {
            tracing::warn!(error = %e, "failed to clear snapshot before reset");
        }
        self.state = fresh;
        let save_warning = self.snapshot().or(clear_warning);
        tracing::info!(
            players = self.state.players.len(),
            captains = self.state.captains.len(),
            "auction reset"
        );
        Ok(Applied {
            outcome: (),
            save_warning,
        })
    }

    // ── Award ───────────────────────────────────────────────────────

    /// Award the current player to `captain_index` for `amount`.
    pub fn award(
        &mut self,
        captain_index: usize,
        amount: i64,
    ) -> Result<Applied<AwardReceipt>, AuctionError> {
        self.apply_award(captain_index, bid::checked_amount(amount))
    }

    /// Award the current player using raw operator input for the amount.
    pub fn award_entry(
        &mut self,
        captain_index: usize,
        entry: &str,
    ) -> Result<Applied<AwardReceipt>, AuctionError> {
        self.apply_award(captain_index, parse_bid(entry))
    }

    /// Award the current player to [`AuctionEngine::best_eligible_captain`].
    pub fn award_to_best(&mut self, amount: i64) -> Result<Applied<AwardReceipt>, AuctionError> {
        let captain_index = self.best_target()?;
        self.apply_award(captain_index, bid::checked_amount(amount))
    }

    /// [`AuctionEngine::award_to_best`] with raw operator input.
    pub fn award_best_entry(&mut self, entry: &str) -> Result<Applied<AwardReceipt>, AuctionError> {
        let captain_index = self.best_target()?;
        self.apply_award(captain_index, parse_bid(entry))
    }

    /// The non-full captain with the largest budget, ties to the earliest.
    pub fn best_eligible_captain(&self) -> Option<usize> {
        self.state.best_eligible_captain()
    }

    fn best_target(&self) -> Result<usize, AuctionError> {
        let player = self.current_player_checked()?;
        if player.sold {
            return Err(AuctionError::AlreadyAwarded {
                player: player.name.clone(),
            });
        }
        self.best_eligible_captain()
            .ok_or(AuctionError::NoEligibleCaptain)
    }

    fn current_player_checked(&self) -> Result<&Player, AuctionError> {
        let index = self.state.current_index;
        self.state
            .players
            .get(index)
            .ok_or(AuctionError::InvalidReference {
                kind: Reference::Player,
                index,
                len: self.state.players.len(),
            })
    }

    /// The award transaction. `amount` is only inspected after the
    /// reference, sold and roster checks, so check order is fixed no matter
    /// how the amount was entered.
    fn apply_award(
        &mut self,
        captain_index: usize,
        amount: Result<u64, AuctionError>,
    ) -> Result<Applied<AwardReceipt>, AuctionError> {
        let captain = self
            .state
            .captains
            .get(captain_index)
            .ok_or(AuctionError::InvalidReference {
                kind: Reference::Captain,
                index: captain_index,
                len: self.state.captains.len(),
            })?;
        let player = self.current_player_checked()?;

        if player.sold {
            return Err(AuctionError::AlreadyAwarded {
                player: player.name.clone(),
            });
        }
        if captain.is_full(self.state.config.team_size) {
            return Err(AuctionError::RosterFull {
                team: captain.team_name.clone(),
            });
        }
        let amount = amount?;
        if amount > captain.budget {
            return Err(AuctionError::InsufficientBudget {
                team: captain.team_name.clone(),
                budget: captain.budget,
                amount,
            });
        }

        // Validated; nothing below can fail.
        let player_index = self.state.current_index;
        let player = &mut self.state.players[player_index];
        let captain = &mut self.state.captains[captain_index];
        captain.acquire(player, amount);
        player.record_sale(amount, &captain.name);

        tracing::info!(
            player = %player.name,
            team = %captain.team_name,
            amount,
            remaining = captain.budget,
            "player awarded"
        );

        let receipt = AwardReceipt {
            player_index,
            captain_index,
            amount,
            player: player.clone(),
            captain: captain.clone(),
        };
        let save_warning = self.snapshot();
        Ok(Applied {
            outcome: receipt,
            save_warning,
        })
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Move to the next unsold player after the cursor. With none left
    /// ahead, step forward by one; at the last player, report completion
    /// without moving.
    pub fn advance_to_next(&mut self) -> Applied<Advance> {
        let len = self.state.players.len();
        let from = self.state.current_index;
        let next_unsold = (from + 1..len).find(|&i| !self.state.players[i].sold);

        let to = match next_unsold {
            Some(i) => i,
            None if from + 1 < len => from + 1,
            None => {
                tracing::info!("auction complete: no players left ahead");
                return Applied {
                    outcome: Advance::Complete,
                    save_warning: None,
                };
            }
        };

        let save_warning = self.move_cursor(to);
        Applied {
            outcome: Advance::Moved { from, to },
            save_warning,
        }
    }

    /// Step forward one player, stopping at the last.
    pub fn advance_next(&mut self) -> Applied<usize> {
        let last = self.state.players.len().saturating_sub(1);
        let to = (self.state.current_index + 1).min(last);
        self.cursor_applied(to)
    }

    /// Step back one player, stopping at the first.
    pub fn advance_prev(&mut self) -> Applied<usize> {
        let to = self.state.current_index.saturating_sub(1);
        self.cursor_applied(to)
    }

    /// Put the cursor on `index`.
    pub fn jump_to(&mut self, index: usize) -> Result<Applied<usize>, AuctionError> {
        let len = self.state.players.len();
        if index >= len {
            return Err(AuctionError::InvalidReference {
                kind: Reference::Player,
                index,
                len,
            });
        }
        Ok(self.cursor_applied(index))
    }

    fn cursor_applied(&mut self, to: usize) -> Applied<usize> {
        let save_warning = self.move_cursor(to);
        Applied {
            outcome: to,
            save_warning,
        }
    }

    fn move_cursor(&mut self, to: usize) -> Option<StoreError> {
        let from = self.state.current_index;
        self.state.current_index = to;
        tracing::debug!(from, to, "cursor moved");
        self.snapshot()
    }
}
