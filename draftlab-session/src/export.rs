//! Roster exports: JSON, CSV, and a paginated plain-text report.
//!
//! All three read a shared [`AuctionState`] and list teams in captain order
//! with each roster in acquisition order.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use draftlab_core::format::{money, rating};
use draftlab_core::{AuctionState, Captain};
use serde::{Deserialize, Serialize};

use crate::config::MIN_REPORT_PAGE_LINES;

pub const REPORT_TITLE: &str = "Football Auction - Final Teams";

/// Page separator in the text report.
pub const PAGE_BREAK: char = '\u{0C}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Report,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "teams.json",
            ExportFormat::Csv => "teams.csv",
            ExportFormat::Report => "teams.txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "report" | "txt" | "text" => Ok(ExportFormat::Report),
            other => bail!("unknown export format '{other}' (expected json, csv or report)"),
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamExport {
    pub captain: String,
    pub team_name: String,
    pub remaining_budget: u64,
    pub players: Vec<ExportedPlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedPlayer {
    pub name: String,
    pub position: String,
    #[serde(serialize_with = "whole_as_integer")]
    pub rating: f64,
    pub price: u64,
}

/// Whole ratings go out as `70`, not `70.0`.
fn whole_as_integer<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let v = *value;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        serializer.serialize_i64(v as i64)
    } else {
        serializer.serialize_f64(v)
    }
}

impl TeamExport {
    fn of(captain: &Captain) -> Self {
        Self {
            captain: captain.name.clone(),
            team_name: captain.team_name.clone(),
            remaining_budget: captain.budget,
            players: captain
                .roster
                .iter()
                .map(|r| ExportedPlayer {
                    name: r.name.clone(),
                    position: r.position.clone(),
                    rating: r.rating,
                    price: r.price,
                })
                .collect(),
        }
    }
}

pub fn team_exports(state: &AuctionState) -> Vec<TeamExport> {
    state.captains.iter().map(TeamExport::of).collect()
}

/// Serialize every team to pretty JSON.
pub fn export_json(state: &AuctionState) -> Result<String> {
    serde_json::to_string_pretty(&team_exports(state)).context("failed to serialize teams to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per acquired player.
///
/// Columns: team_name, captain, remaining_budget, pick, name, position,
/// rating, price
pub fn export_csv(state: &AuctionState) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "team_name",
        "captain",
        "remaining_budget",
        "pick",
        "name",
        "position",
        "rating",
        "price",
    ])?;

    for c in &state.captains {
        for (i, r) in c.roster.iter().enumerate() {
            wtr.write_record([
                &c.team_name,
                &c.name,
                &c.budget.to_string(),
                &(i + 1).to_string(),
                &r.name,
                &r.position,
                &rating(r.rating),
                &r.price.to_string(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Text report ────────────────────────────────────────────────────

struct Pages {
    pages: Vec<Vec<String>>,
    page_lines: usize,
}

impl Pages {
    fn new(page_lines: usize) -> Self {
        Self {
            pages: vec![Vec::new()],
            page_lines,
        }
    }

    fn current(&mut self) -> &mut Vec<String> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn remaining(&self) -> usize {
        let used = self.pages.last().map_or(0, Vec::len);
        self.page_lines.saturating_sub(used)
    }

    fn break_page(&mut self) {
        if self.pages.last().is_some_and(|p| !p.is_empty()) {
            self.pages.push(Vec::new());
        }
    }

    fn push(&mut self, line: String) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current().push(line);
    }

    /// Blank spacer lines are dropped at a page end instead of spilling over.
    fn gap(&mut self) {
        if self.remaining() > 0 {
            self.current().push(String::new());
        }
    }
}

/// Lay the report out as pages of at most `page_lines` lines.
///
/// A team's header, budget line and first roster line always share a page.
pub fn report_pages(state: &AuctionState, page_lines: usize) -> Vec<Vec<String>> {
    let mut pages = Pages::new(page_lines.max(MIN_REPORT_PAGE_LINES));
    pages.push(REPORT_TITLE.to_string());
    pages.push("=".repeat(REPORT_TITLE.len()));
    pages.gap();

    for c in &state.captains {
        // header + budget + "Players:" + first player (or "Players: None")
        let block = if c.roster.is_empty() { 3 } else { 4 };
        if pages.remaining() < block {
            pages.break_page();
        }

        pages.push(format!("{}  ({})", c.team_name, c.name));
        pages.push(format!("Remaining Budget: {}", money(c.budget)));
        if c.roster.is_empty() {
            pages.push("Players: None".to_string());
        } else {
            pages.push("Players:".to_string());
            for (i, r) in c.roster.iter().enumerate() {
                pages.push(format!(
                    "{}. {}  •  {}  •  Rating {}  •  {}",
                    i + 1,
                    r.name,
                    r.position,
                    rating(r.rating),
                    money(r.price)
                ));
            }
        }
        pages.gap();
    }

    for page in &mut pages.pages {
        while page.last().is_some_and(String::is_empty) {
            page.pop();
        }
    }
    pages.pages.retain(|p| !p.is_empty());
    pages.pages
}

/// Render the report as text with form feeds between pages.
pub fn export_report(state: &AuctionState, page_lines: usize) -> String {
    let pages: Vec<String> = report_pages(state, page_lines)
        .into_iter()
        .map(|lines| lines.join("\n") + "\n")
        .collect();
    pages.join(&PAGE_BREAK.to_string())
}

// ─── Saving ─────────────────────────────────────────────────────────

pub fn render(state: &AuctionState, format: ExportFormat, page_lines: usize) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(state),
        ExportFormat::Csv => export_csv(state),
        ExportFormat::Report => Ok(export_report(state, page_lines)),
    }
}

/// Render `format` and write it to `path`, creating parent directories.
pub fn save_export(
    state: &AuctionState,
    format: ExportFormat,
    path: &Path,
    page_lines: usize,
) -> Result<()> {
    let contents = render(state, format, page_lines)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), ?format, "teams exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use draftlab_core::{AuctionConfig, Player};

    use super::*;

    fn drafted_state(teams: usize, per_team: usize) -> AuctionState {
        let players = teams * per_team;
        let mut state = AuctionState::new(
            (0..players)
                .map(|i| Player::new(format!("Player {i}"), "MF", None, 70.0 + i as f64))
                .collect(),
            (0..teams)
                .map(|i| Captain::new(format!("Cap {i}"), format!("Team {i}"), 20_000))
                .collect(),
            AuctionConfig::new(per_team + 1, 20_000).unwrap(),
        );
        for i in 0..players {
            state.current_index = i;
            let mut engine =
                draftlab_core::AuctionEngine::new(state, draftlab_core::MemoryStore::new()).unwrap();
            engine.award(i % teams, 1_500).unwrap();
            state = engine.into_state();
        }
        state.current_index = 0;
        state
    }

    #[test]
    fn json_uses_camel_case_and_roster_order() {
        let state = drafted_state(2, 2);
        let json = export_json(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["teamName"], "Team 0");
        assert_eq!(value[0]["remainingBudget"], 17_000);
        assert_eq!(value[0]["players"][0]["name"], "Player 0");
        assert_eq!(value[0]["players"][1]["name"], "Player 2");
        assert_eq!(value[1]["players"][0]["price"], 1_500);
    }

    #[test]
    fn json_writes_whole_ratings_as_integers() {
        let mut state = drafted_state(1, 2);
        state.captains[0].roster[1].rating = 72.5;
        let json = export_json(&state).unwrap();
        assert!(json.contains("\"rating\": 70,"), "{json}");
        assert!(json.contains("\"rating\": 72.5,"), "{json}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["players"][0]["rating"].as_u64(), Some(70));
        let back: Vec<TeamExport> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].players[0].rating, 70.0);
        assert_eq!(back[0].players[1].rating, 72.5);
    }

    #[test]
    fn csv_has_one_row_per_pick() {
        let state = drafted_state(2, 3);
        let csv = export_csv(&state).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "team_name,captain,remaining_budget,pick,name,position,rating,price"
        );
        assert_eq!(lines.len(), 1 + 6);
        assert_eq!(lines[1], "Team 0,Cap 0,15500,1,Player 0,MF,70,1500");
    }

    #[test]
    fn report_lines_match_layout() {
        let mut state = drafted_state(1, 1);
        state.captains.push(Captain::new("Empty", "Idle FC", 20_000));
        let text = export_report(&state, 48);
        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("Team 0  (Cap 0)\nRemaining Budget: 18,500\nPlayers:\n"));
        assert!(text.contains("1. Player 0  •  MF  •  Rating 70  •  1,500"));
        assert!(text.contains("Idle FC  (Empty)\nRemaining Budget: 20,000\nPlayers: None"));
        assert!(!text.contains(PAGE_BREAK));
    }

    #[test]
    fn report_pages_respect_budget_and_keep_headers_attached() {
        let state = drafted_state(6, 5);
        let pages = report_pages(&state, 12);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.len() <= 12);
            let last = page.last().unwrap();
            assert!(!last.contains("  ("), "header orphaned at page end: {page:?}");
            assert!(!last.starts_with("Remaining Budget"));
            assert_ne!(last, "Players:");
        }
        let text = export_report(&state, 12);
        assert_eq!(text.matches(PAGE_BREAK).count(), pages.len() - 1);
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Report);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn save_export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/teams.csv");
        save_export(&drafted_state(1, 1), ExportFormat::Csv, &path, 48).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().starts_with("team_name"));
    }
}
