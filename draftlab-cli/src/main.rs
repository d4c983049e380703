//! DraftLab CLI: run a player auction from the terminal.
//!
//! Commands:
//! - `init`: start (or resume) an auction from the configured feeds
//! - `status`, `players`, `teams`: inspect the running auction
//! - `award`, `award-best`: sell the current player
//! - `next`, `prev`, `skip`, `jump`: move the cursor
//! - `export`: write final teams as JSON, CSV or a printable report
//! - `reset`: discard all progress and reload the feeds
//! - `live`: interactive session with a restore prompt
//! - `config`: print a default `draftlab.toml`

mod live;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use draftlab_core::format::{money, rating};
use draftlab_core::{Advance, Applied, AuctionState, AwardReceipt, BudgetLevel};
use draftlab_session::{
    default_config_template, export, ExportFormat, Session, SessionConfig, StartChoice, StartMode,
};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "draftlab.toml";

#[derive(Parser)]
#[command(name = "draftlab", about = "DraftLab: live player auction for team drafts")]
struct Cli {
    /// Session config file. Defaults to ./draftlab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an auction from the feeds, or resume the saved one.
    Init {
        /// Throw away any saved auction and start fresh.
        #[arg(long, default_value_t = false)]
        discard: bool,
    },
    /// Show the current player, progress and team budgets.
    Status,
    /// List every player with sale outcomes.
    Players,
    /// List every team with its roster.
    Teams,
    /// Award the current player to a team.
    Award {
        /// Captain name, team name, or 1-based team number.
        captain: String,

        /// Winning bid. Fractions are rounded down.
        amount: String,

        /// Stay on this player instead of moving to the next unsold one.
        #[arg(long, default_value_t = false)]
        stay: bool,
    },
    /// Award the current player to the team with the most budget left.
    AwardBest {
        /// Winning bid. Fractions are rounded down.
        amount: String,

        /// Stay on this player instead of moving to the next unsold one.
        #[arg(long, default_value_t = false)]
        stay: bool,
    },
    /// Step to the next player.
    Next,
    /// Step to the previous player.
    Prev,
    /// Move to the next unsold player.
    Skip,
    /// Put the cursor on a player by 1-based number.
    Jump { number: usize },
    /// Export final teams.
    Export {
        /// json, csv or report.
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Discard all progress and reload the feeds.
    Reset {
        /// Actually reset (without this flag, only shows what would be lost).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Interactive auction session.
    Live,
    /// Print a default draftlab.toml.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);
    tracing::debug!(store = %config.store.resolved_dir().display(), "session config loaded");

    match cli.command {
        Commands::Init { discard } => run_init(&config, discard),
        Commands::Status => {
            let session = open(&config)?;
            print_status(session.engine().state());
            Ok(())
        }
        Commands::Players => {
            let session = open(&config)?;
            print_players(session.engine().state());
            Ok(())
        }
        Commands::Teams => {
            let session = open(&config)?;
            print_teams(session.engine().state());
            Ok(())
        }
        Commands::Award {
            captain,
            amount,
            stay,
        } => {
            let mut session = open(&config)?;
            award(&mut session, Some(captain.as_str()), &amount, config.session.auto_advance && !stay)
        }
        Commands::AwardBest { amount, stay } => {
            let mut session = open(&config)?;
            award(&mut session, None, &amount, config.session.auto_advance && !stay)
        }
        Commands::Next => {
            let mut session = open(&config)?;
            let applied = session.engine_mut().advance_next();
            warn_unsaved(&applied);
            print_status(session.engine().state());
            Ok(())
        }
        Commands::Prev => {
            let mut session = open(&config)?;
            let applied = session.engine_mut().advance_prev();
            warn_unsaved(&applied);
            print_status(session.engine().state());
            Ok(())
        }
        Commands::Skip => {
            let mut session = open(&config)?;
            skip(&mut session);
            print_status(session.engine().state());
            Ok(())
        }
        Commands::Jump { number } => {
            let mut session = open(&config)?;
            jump(&mut session, number)?;
            print_status(session.engine().state());
            Ok(())
        }
        Commands::Export { format, out } => {
            let format: ExportFormat = format.parse()?;
            let session = open(&config)?;
            run_export(&session, format, out.as_deref(), config.session.report_page_lines)
        }
        Commands::Reset { confirm } => run_reset(&config, confirm),
        Commands::Live => live::run(&config),
        Commands::Config => {
            print!("{}", default_config_template());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            SessionConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))
        }
        None => Ok(SessionConfig::default()),
    }
}

/// `RUST_LOG` wins, then the config's `log_level`, then `info`. Logs go to
/// stderr so exports on stdout stay clean.
fn init_logging(config: &SessionConfig) {
    let fallback = config.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open(config: &SessionConfig) -> Result<Session> {
    let session = Session::resume(config.store.file_store(), config.catalog_source())
        .context("failed to open auction")?;
    if let Some(e) = session.startup_warning() {
        eprintln!("warning: progress is not being saved: {e}");
    }
    Ok(session)
}

fn run_init(config: &SessionConfig, discard: bool) -> Result<()> {
    let session = Session::open(
        config.store.file_store(),
        config.catalog_source(),
        |_| {
            if discard {
                StartChoice::Discard
            } else {
                StartChoice::Restore
            }
        },
    )
    .context("failed to start auction")?;
    if let Some(e) = session.startup_warning() {
        eprintln!("warning: progress is not being saved: {e}");
    }

    match session.mode() {
        StartMode::Fresh => println!("Started a new auction."),
        StartMode::Restored => {
            println!("Resumed the saved auction (use --discard to start over).")
        }
        StartMode::Discarded => println!("Discarded the saved auction and started a new one."),
    }
    println!("Snapshot: {}", session.engine().store_location());
    println!();
    print_status(session.engine().state());
    Ok(())
}

fn run_reset(config: &SessionConfig, confirm: bool) -> Result<()> {
    let mut session = open(config)?;
    let progress = session.engine().state().progress();
    if !confirm {
        println!(
            "Reset would discard {} sold player(s) of {}. Re-run with --confirm.",
            progress.sold, progress.total
        );
        return Ok(());
    }
    let applied = session.reset().context("reset failed")?;
    warn_unsaved(&applied);
    println!("Auction reset: {} players, all budgets restored.", progress.total);
    Ok(())
}

fn run_export(
    session: &Session,
    format: ExportFormat,
    out: Option<&Path>,
    page_lines: usize,
) -> Result<()> {
    let state = session.engine().state();
    match out {
        Some(path) => {
            export::save_export(state, format, path, page_lines)?;
            println!("Teams exported to: {}", path.display());
        }
        None => print!("{}", export::render(state, format, page_lines)?),
    }
    Ok(())
}

// ── Shared operator actions ─────────────────────────────────────────

/// Resolve a captain by name, team name, or 1-based team number.
pub(crate) fn resolve_captain(state: &AuctionState, query: &str) -> Result<usize> {
    if let Some(i) = state.find_captain(query) {
        return Ok(i);
    }
    if let Ok(n) = query.trim().parse::<usize>() {
        if (1..=state.captains.len()).contains(&n) {
            return Ok(n - 1);
        }
    }
    bail!("no team matches '{query}'")
}

pub(crate) fn award(
    session: &mut Session,
    captain: Option<&str>,
    amount: &str,
    auto_advance: bool,
) -> Result<()> {
    let engine = session.engine_mut();
    let applied = match captain {
        Some(query) => {
            let index = resolve_captain(engine.state(), query)?;
            engine.award_entry(index, amount)?
        }
        None => engine.award_best_entry(amount)?,
    };
    warn_unsaved(&applied);
    print_receipt(&applied.outcome);

    if auto_advance {
        skip(session);
    }
    Ok(())
}

pub(crate) fn skip(session: &mut Session) {
    let applied = session.engine_mut().advance_to_next();
    warn_unsaved(&applied);
    if applied.outcome == Advance::Complete {
        println!("Auction complete: no players left.");
    }
}

pub(crate) fn jump(session: &mut Session, number: usize) -> Result<()> {
    if number == 0 {
        bail!("player numbers start at 1");
    }
    let applied = session.engine_mut().jump_to(number - 1)?;
    warn_unsaved(&applied);
    Ok(())
}

pub(crate) fn warn_unsaved<T>(applied: &Applied<T>) {
    if let Some(e) = &applied.save_warning {
        eprintln!("warning: progress not saved, auction continues in memory: {e}");
    }
}

// ── Display ─────────────────────────────────────────────────────────

fn level_tag(level: BudgetLevel) -> &'static str {
    match level {
        BudgetLevel::Healthy => "",
        BudgetLevel::Low => " [low]",
        BudgetLevel::Critical => " [critical]",
    }
}

pub(crate) fn print_receipt(receipt: &AwardReceipt) {
    println!(
        "SOLD: {} to {} for {} ({} left)",
        receipt.player.name,
        receipt.captain.team_name,
        money(receipt.amount),
        money(receipt.captain.budget)
    );
}

/// "Player N/M: name | position | Rating r", with N 1-based like `jump`.
fn current_player_line(state: &AuctionState) -> Option<String> {
    let progress = state.progress();
    let (p, pos) = state.current_player().zip(progress.position)?;
    Some(format!(
        "Player {}/{}: {} | {} | Rating {}",
        pos,
        progress.total,
        p.name,
        p.position,
        rating(p.rating)
    ))
}

pub(crate) fn print_status(state: &AuctionState) {
    let progress = state.progress();
    match (state.current_player(), current_player_line(state)) {
        (Some(p), Some(line)) => {
            println!("{line}");
            match (&p.awarded_to, p.sold_price) {
                (Some(winner), Some(price)) => {
                    println!("  Sold to {winner} for {}", money(price))
                }
                _ => println!("  Unsold"),
            }
        }
        _ => println!("No players in the catalog."),
    }
    println!(
        "Sold {} of {} ({} remaining)",
        progress.sold, progress.total, progress.remaining
    );
    if state.is_complete() {
        println!("All players sold.");
    }
    println!();
    for t in state.team_summaries() {
        println!(
            "  {:<20} {:>10}{}  {}/{}{}",
            t.team_name,
            money(t.remaining_budget),
            level_tag(t.budget_level),
            t.team_size,
            t.team_size_cap,
            if t.full { " FULL" } else { "" }
        );
    }
}

pub(crate) fn print_players(state: &AuctionState) {
    for (i, p) in state.players.iter().enumerate() {
        let marker = if i == state.current_index { ">" } else { " " };
        let outcome = match (&p.awarded_to, p.sold_price) {
            (Some(winner), Some(price)) => format!("{winner} @ {}", money(price)),
            _ => "-".to_string(),
        };
        println!(
            "{marker}{:>4}. {:<24} {:<4} {:>5}  {}",
            i + 1,
            p.name,
            p.position,
            rating(p.rating),
            outcome
        );
    }
}

pub(crate) fn print_teams(state: &AuctionState) {
    let cap = state.config.team_size;
    for c in &state.captains {
        let summary = c.summary(cap);
        println!(
            "{}  ({})  budget {} / {}{}  size {}/{}",
            c.team_name,
            c.name,
            money(c.budget),
            money(c.initial_budget),
            level_tag(summary.budget_level),
            summary.team_size,
            cap
        );
        if c.roster.is_empty() {
            println!("    (no players yet)");
        }
        for (i, r) in c.roster.iter().enumerate() {
            println!(
                "    {}. {} | {} | Rating {} | {}",
                i + 1,
                r.name,
                r.position,
                rating(r.rating),
                money(r.price)
            );
        }
    }
}
