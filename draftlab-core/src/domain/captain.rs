//! Captain ledger: budget plus acquired roster.

use serde::{Deserialize, Serialize};

use super::player::Player;

/// Snapshot of an acquired player, frozen at award time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub position: String,
    pub rating: f64,
    pub price: u64,
}

impl RosterEntry {
    pub fn from_player(player: &Player, price: u64) -> Self {
        Self {
            name: player.name.clone(),
            position: player.position.clone(),
            rating: player.rating,
            price,
        }
    }
}

/// A team captain and their ledger.
///
/// The captain occupies the first roster slot implicitly, so the team size
/// is `1 + roster.len()`. `budget` only ever decreases, and only through
/// award transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captain {
    pub name: String,
    pub team_name: String,
    pub budget: u64,
    pub initial_budget: u64,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl Captain {
    pub fn new(name: impl Into<String>, team_name: impl Into<String>, initial_budget: u64) -> Self {
        Self {
            name: name.into(),
            team_name: team_name.into(),
            budget: initial_budget,
            initial_budget,
            roster: Vec::new(),
        }
    }

    /// Current team size, counting the captain.
    pub fn team_size(&self) -> usize {
        1 + self.roster.len()
    }

    pub fn is_full(&self, team_size_cap: usize) -> bool {
        self.team_size() >= team_size_cap
    }

    pub fn spent(&self) -> u64 {
        self.initial_budget.saturating_sub(self.budget)
    }

    pub fn budget_level(&self) -> BudgetLevel {
        BudgetLevel::classify(self.budget, self.initial_budget)
    }

    pub fn summary(&self, team_size_cap: usize) -> TeamSummary {
        TeamSummary {
            captain: self.name.clone(),
            team_name: self.team_name.clone(),
            team_size: self.team_size(),
            team_size_cap,
            remaining_budget: self.budget,
            spent: self.spent(),
            players_acquired: self.roster.len(),
            full: self.is_full(team_size_cap),
            budget_level: self.budget_level(),
        }
    }

    pub(crate) fn acquire(&mut self, player: &Player, price: u64) {
        self.budget -= price;
        self.roster.push(RosterEntry::from_player(player, price));
    }
}

/// How much of its starting budget a team has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Healthy,
    /// 20% or less remaining.
    Low,
    /// 10% or less remaining.
    Critical,
}

impl BudgetLevel {
    pub fn classify(budget: u64, initial_budget: u64) -> Self {
        if initial_budget == 0 {
            return BudgetLevel::Critical;
        }
        let ratio = budget as f64 / initial_budget as f64;
        if ratio <= 0.1 {
            BudgetLevel::Critical
        } else if ratio <= 0.2 {
            BudgetLevel::Low
        } else {
            BudgetLevel::Healthy
        }
    }
}

/// Read model for per-team dashboards and listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub captain: String,
    pub team_name: String,
    pub team_size: usize,
    pub team_size_cap: usize,
    pub remaining_budget: u64,
    pub spent: u64,
    pub players_acquired: usize,
    pub full: bool,
    pub budget_level: BudgetLevel,
}
