//! Interactive auction: one command per line on stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use draftlab_session::{export, ExportFormat, Session, SessionConfig, SnapshotSummary, StartChoice};

use crate::{award, jump, print_players, print_status, print_teams, skip, warn_unsaved};

const HELP: &str = "\
Commands:
  a <team> <amount>       award the current player (team name, captain or number)
  b <amount>              award to the team with the most budget left
  n | p                   next / previous player
  k                       skip to the next unsold player
  j <number>              jump to a player
  s | l | t               status / players / teams
  e <json|csv|report> [file]
  reset                   start over from the feeds
  q                       quit";

pub fn run(config: &SessionConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut session = Session::open(config.store.file_store(), config.catalog_source(), |summary| {
        ask_restore(summary, &mut lines)
    })
    .context("failed to start auction")?;
    if let Some(e) = session.startup_warning() {
        eprintln!("warning: progress is not being saved: {e}");
    }

    println!("{HELP}");
    println!();
    print_status(session.engine().state());

    loop {
        prompt()?;
        let Some(line) = lines.next() else { break };
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match dispatch(&mut session, config, line, &mut lines) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn dispatch<B: BufRead>(
    session: &mut Session,
    config: &SessionConfig,
    line: &str,
    lines: &mut io::Lines<B>,
) -> Result<Flow> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match cmd {
        "q" | "quit" | "exit" => return Ok(Flow::Quit),
        "h" | "help" | "?" => println!("{HELP}"),
        "s" | "status" => print_status(session.engine().state()),
        "l" | "players" => print_players(session.engine().state()),
        "t" | "teams" => print_teams(session.engine().state()),
        "a" | "award" => {
            let Some((team, amount)) = rest.rsplit_once(' ') else {
                bail!("usage: a <team> <amount>");
            };
            award(session, Some(team.trim()), amount, config.session.auto_advance)?;
            print_status(session.engine().state());
        }
        "b" | "best" => {
            award(session, None, rest, config.session.auto_advance)?;
            print_status(session.engine().state());
        }
        "n" | "next" => {
            warn_unsaved(&session.engine_mut().advance_next());
            print_status(session.engine().state());
        }
        "p" | "prev" => {
            warn_unsaved(&session.engine_mut().advance_prev());
            print_status(session.engine().state());
        }
        "k" | "skip" => {
            skip(session);
            print_status(session.engine().state());
        }
        "j" | "jump" => {
            let number: usize = rest
                .parse()
                .with_context(|| format!("'{rest}' is not a player number"))?;
            jump(session, number)?;
            print_status(session.engine().state());
        }
        "e" | "export" => {
            let (format, out) = rest.split_once(' ').unwrap_or((rest, ""));
            let format: ExportFormat = format.parse()?;
            let out = if out.trim().is_empty() {
                PathBuf::from(format.default_file_name())
            } else {
                PathBuf::from(out.trim())
            };
            export::save_export(
                session.engine().state(),
                format,
                &out,
                config.session.report_page_lines,
            )?;
            println!("Teams exported to: {}", out.display());
        }
        "reset" => {
            print!("Type RESET to discard all progress: ");
            io::stdout().flush()?;
            let answer = lines.next().transpose()?.unwrap_or_default();
            if answer.trim() != "RESET" {
                println!("Reset cancelled.");
            } else {
                warn_unsaved(&session.reset()?);
                println!("Auction reset.");
                print_status(session.engine().state());
            }
        }
        other => bail!("unknown command '{other}' (h for help)"),
    }
    Ok(Flow::Continue)
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

fn ask_restore<B: BufRead>(summary: &SnapshotSummary, lines: &mut io::Lines<B>) -> StartChoice {
    let saved = summary
        .saved_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "an unknown time".to_string());
    println!(
        "Found a saved auction from {saved}: {} of {} players sold, {} teams, at player {}.",
        summary.sold,
        summary.total,
        summary.teams,
        summary.current_index + 1
    );
    print!("Restore it? [Y/n] ");
    let _ = io::stdout().flush();

    match lines.next() {
        Some(Ok(answer)) if matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no") => {
            StartChoice::Discard
        }
        _ => StartChoice::Restore,
    }
}
