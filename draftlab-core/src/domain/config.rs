//! Auction parameters from the config feed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("teamSize must be at least 1 (the captain's own slot), got {0}")]
    TeamSizeTooSmall(usize),
}

/// Static auction parameters. Immutable once an auction has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionConfig {
    /// Maximum team size including the captain.
    pub team_size: usize,
    /// Starting budget for every captain.
    pub initial_budget: u64,
}

impl AuctionConfig {
    pub fn new(team_size: usize, initial_budget: u64) -> Result<Self, ConfigError> {
        let config = Self {
            team_size,
            initial_budget,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_size < 1 {
            return Err(ConfigError::TeamSizeTooSmall(self.team_size));
        }
        Ok(())
    }

    /// Number of players each team can buy (cap minus the captain).
    pub fn purchasable_slots(&self) -> usize {
        self.team_size.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_feed() {
        let cfg: AuctionConfig =
            serde_json::from_str(r#"{"teamSize": 5, "initialBudget": 10000}"#).unwrap();
        assert_eq!(cfg.team_size, 5);
        assert_eq!(cfg.initial_budget, 10_000);
        assert_eq!(cfg.purchasable_slots(), 4);
    }

    #[test]
    fn zero_team_size_rejected() {
        assert_eq!(
            AuctionConfig::new(0, 100),
            Err(ConfigError::TeamSizeTooSmall(0))
        );
    }

    #[test]
    fn negative_budget_does_not_parse() {
        let res: Result<AuctionConfig, _> =
            serde_json::from_str(r#"{"teamSize": 5, "initialBudget": -1}"#);
        assert!(res.is_err());
    }
}
