//! Catalog feed loading from local files or HTTP.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use draftlab_core::{Catalog, Feed, LoadError};

/// Where a single feed document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Path(PathBuf),
    Url(String),
}

impl FeedSource {
    /// `http://` and `https://` entries are URLs, anything else is a path.
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        if entry.starts_with("http://") || entry.starts_with("https://") {
            FeedSource::Url(entry.to_string())
        } else {
            FeedSource::Path(PathBuf::from(entry))
        }
    }

    fn describe(&self) -> String {
        match self {
            FeedSource::Path(p) => p.display().to_string(),
            FeedSource::Url(u) => u.clone(),
        }
    }

    /// Fetch the raw document.
    pub fn read(&self, feed: Feed) -> Result<String, LoadError> {
        let unreadable = |reason: String| LoadError::Unreadable {
            feed,
            source_ref: self.describe(),
            reason,
        };
        match self {
            FeedSource::Path(p) => fs::read_to_string(p).map_err(|e| unreadable(e.to_string())),
            FeedSource::Url(u) => fetch_url(u).map_err(|e| unreadable(e.to_string())),
        }
    }
}

fn fetch_url(url: &str) -> Result<String, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    client.get(url).send()?.error_for_status()?.text()
}

/// The three feeds that make up a fresh auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub players: FeedSource,
    pub captains: FeedSource,
    pub config: FeedSource,
}

impl CatalogSource {
    pub fn new(players: &str, captains: &str, config: &str) -> Self {
        Self {
            players: FeedSource::parse(players),
            captains: FeedSource::parse(captains),
            config: FeedSource::parse(config),
        }
    }

    /// Read and parse all three feeds. Fails on the first missing or
    /// malformed feed; no partial catalog is ever returned.
    pub fn load(&self) -> Result<Catalog, LoadError> {
        let players = self.players.read(Feed::Players)?;
        let captains = self.captains.read(Feed::Captains)?;
        let config = self.config.read(Feed::Config)?;
        let catalog = Catalog::from_json(&players, &captains, &config)?;
        tracing::info!(
            players = catalog.players.len(),
            captains = catalog.captains.len(),
            team_size = catalog.config.team_size,
            initial_budget = catalog.config.initial_budget,
            "catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_and_paths() {
        assert_eq!(
            FeedSource::parse("https://example.org/players.json"),
            FeedSource::Url("https://example.org/players.json".into())
        );
        assert_eq!(
            FeedSource::parse(" data/players.json "),
            FeedSource::Path(PathBuf::from("data/players.json"))
        );
        assert_eq!(
            FeedSource::parse("ftp-mirror/x.json"),
            FeedSource::Path(PathBuf::from("ftp-mirror/x.json"))
        );
    }

    #[test]
    fn missing_file_is_unreadable_with_feed_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = FeedSource::Path(dir.path().join("nope.json"));
        let err = source.read(Feed::Captains).unwrap_err();
        match err {
            LoadError::Unreadable { feed, source_ref, .. } => {
                assert_eq!(feed, Feed::Captains);
                assert!(source_ref.ends_with("nope.json"));
            }
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn load_reads_all_three_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("players.json");
        let c = dir.path().join("captains.json");
        let g = dir.path().join("config.json");
        fs::write(&p, r#"{"players":[{"name":"P1","position":"FW","rating":80}]}"#).unwrap();
        fs::write(&c, r#"{"captains":[{"name":"A","teamName":"Reds"}]}"#).unwrap();
        fs::write(&g, r#"{"teamSize":3,"initialBudget":500}"#).unwrap();

        let source = CatalogSource::new(
            p.to_str().unwrap(),
            c.to_str().unwrap(),
            g.to_str().unwrap(),
        );
        let catalog = source.load().unwrap();
        assert_eq!(catalog.players.len(), 1);
        assert_eq!(catalog.captains[0].team_name, "Reds");
        assert_eq!(catalog.config.initial_budget, 500);
    }
}
