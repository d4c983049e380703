//! Catalog feeds and fresh-start construction.
//!
//! Three JSON feeds describe an auction: the player list, the captain list
//! and the auction config. Construction is pure and order-preserving: the
//! player feed order is the bidding order.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AuctionConfig, AuctionState, Captain, ConfigError, Player};

/// Which feed a load error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Players,
    Captains,
    Config,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Players => write!(f, "players"),
            Feed::Captains => write!(f, "captains"),
            Feed::Config => write!(f, "config"),
        }
    }
}

/// Fresh-start load failure. No auction state exists when this is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {feed} feed from {source_ref}: {reason}")]
    Unreadable {
        feed: Feed,
        source_ref: String,
        reason: String,
    },

    #[error("malformed {feed} feed: {source}")]
    Malformed {
        feed: Feed,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config feed: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// One entry of the player feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDef {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub rating: f64,
}

/// One entry of the captain feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainDef {
    pub name: String,
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
struct PlayersFeed {
    players: Vec<PlayerDef>,
}

#[derive(Debug, Deserialize)]
struct CaptainsFeed {
    captains: Vec<CaptainDef>,
}

/// The raw source data for an auction, validated but not yet turned into
/// mutable state. Kept around so a reset can rebuild from the same source.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub players: Vec<PlayerDef>,
    pub captains: Vec<CaptainDef>,
    pub config: AuctionConfig,
}

impl Catalog {
    pub fn new(
        players: Vec<PlayerDef>,
        captains: Vec<CaptainDef>,
        config: AuctionConfig,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        Ok(Self {
            players,
            captains,
            config,
        })
    }

    /// Parse the three feed documents. Any malformed feed fails the whole
    /// load; there is no partial catalog.
    pub fn from_json(
        players_json: &str,
        captains_json: &str,
        config_json: &str,
    ) -> Result<Self, LoadError> {
        let players: PlayersFeed =
            serde_json::from_str(players_json).map_err(|source| LoadError::Malformed {
                feed: Feed::Players,
                source,
            })?;
        let captains: CaptainsFeed =
            serde_json::from_str(captains_json).map_err(|source| LoadError::Malformed {
                feed: Feed::Captains,
                source,
            })?;
        let config: AuctionConfig =
            serde_json::from_str(config_json).map_err(|source| LoadError::Malformed {
                feed: Feed::Config,
                source,
            })?;
        Self::new(players.players, captains.captains, config)
    }

    /// Build fresh auction state: every player unsold, every captain at the
    /// configured initial budget with an empty roster, cursor at 0.
    pub fn build_state(&self) -> AuctionState {
        let players = self
            .players
            .iter()
            .map(|p| Player::new(&p.name, &p.position, p.photo.clone(), p.rating))
            .collect();
        let captains = self
            .captains
            .iter()
            .map(|c| Captain::new(&c.name, &c.team_name, self.config.initial_budget))
            .collect();
        AuctionState::new(players, captains, self.config)
    }
}
