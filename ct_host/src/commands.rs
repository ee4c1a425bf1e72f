//! Operator commands.
//!
//! Every invocation loads the stores, applies one command and persists the result.

use anyhow::{Context, Result, bail};
use casual_tourney::{
    ManualPairing, Mode, Standing, TournamentManager,
    tournament::{PendingRound, RoundPhase, round_percent},
};
use log::info;
use pico_args::Arguments;
use std::path::PathBuf;

use crate::{
    config::HostConfig,
    publisher::{SnapshotPublisher, write_export, write_export_to},
    store::Store,
};

/// Which way to resolve a pending round whose tables were lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Discard,
    Restore,
}

/// Changes requested by `config`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigChange {
    pub title: Option<String>,
    pub mode: Option<Mode>,
    pub rounds: Option<u32>,
    /// `Some(None)` goes back to a derived pattern
    pub tables: Option<Option<Vec<usize>>>,
    pub fix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    Remove(String),
    Players,
    Config(ConfigChange),
    Generate,
    ManualStart,
    Pair(String, String),
    Bye(String),
    ManualUndo,
    ManualConfirm,
    /// Table, rank and entry, all 1-based as typed
    Place(usize, usize, usize),
    Unplace(usize, usize),
    Show,
    Save,
    Discard,
    Recover(Recovery),
    Standings,
    Rounds,
    Export(Option<PathBuf>),
    ClearRounds,
    Reset,
}

impl Command {
    /// Parse the subcommand and its arguments
    pub fn parse(pargs: &mut Arguments) -> Result<Self> {
        let Some(name) = pargs.subcommand()? else {
            bail!("missing command (see --help)");
        };

        let command = match name.as_str() {
            "add" => Command::Add(pargs.free_from_str()?),
            "remove" => Command::Remove(pargs.free_from_str()?),
            "players" => Command::Players,
            "config" => Command::Config(ConfigChange {
                title: pargs.opt_value_from_str("--title")?,
                mode: pargs.opt_value_from_str("--mode")?,
                rounds: pargs.opt_value_from_str("--rounds")?,
                tables: pargs.opt_value_from_fn("--tables", parse_table_sizes)?,
                fix: pargs.contains("--fix"),
            }),
            "generate" => Command::Generate,
            "manual-start" => Command::ManualStart,
            "pair" => Command::Pair(pargs.free_from_str()?, pargs.free_from_str()?),
            "bye" => Command::Bye(pargs.free_from_str()?),
            "manual-undo" => Command::ManualUndo,
            "manual-confirm" => Command::ManualConfirm,
            "place" => Command::Place(
                pargs.free_from_str()?,
                pargs.free_from_str()?,
                pargs.free_from_str()?,
            ),
            "unplace" => Command::Unplace(pargs.free_from_str()?, pargs.free_from_str()?),
            "show" => Command::Show,
            "save" => Command::Save,
            "discard" => Command::Discard,
            "recover" => {
                let choice: String = pargs.free_from_str()?;
                match choice.as_str() {
                    "discard" => Command::Recover(Recovery::Discard),
                    "restore" => Command::Recover(Recovery::Restore),
                    other => bail!("unknown recovery choice {other:?} (use discard or restore)"),
                }
            }
            "standings" => Command::Standings,
            "rounds" => Command::Rounds,
            "export" => Command::Export(pargs.opt_free_from_str()?),
            "clear-rounds" => Command::ClearRounds,
            "reset" => Command::Reset,
            other => bail!("unknown command {other:?} (see --help)"),
        };
        Ok(command)
    }
}

/// `4,4,3` or `auto`
fn parse_table_sizes(value: &str) -> Result<Option<Vec<usize>>, String> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid table size {s:?}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// 1-based position typed by the operator to a 0-based index
fn index(value: usize, what: &str) -> Result<usize> {
    value
        .checked_sub(1)
        .with_context(|| format!("{what} numbers start at 1"))
}

/// Loaded tournament plus the stores it persists to
pub struct Session {
    pub manager: TournamentManager,
    store: Store,
    config: HostConfig,
}

impl Session {
    pub fn open(config: HostConfig) -> Result<Self> {
        let store = Store::open(&config.data_dir)?;
        let mut manager = store.load(&config)?;
        manager.subscribe(SnapshotPublisher::new(store.clone()));
        Ok(Self {
            manager,
            store,
            config,
        })
    }

    pub fn persist(&self) -> Result<()> {
        self.store.save(&self.manager)
    }

    pub fn run(&mut self, command: Command) -> Result<()> {
        let manager = &mut self.manager;
        match command {
            Command::Add(name) => {
                let name = manager.add_participant(&name)?;
                println!("Added {name} ({} registered)", manager.participants().len());
            }
            Command::Remove(name) => {
                let name = manager.remove_participant(&name)?;
                println!("Removed {name}");
            }
            Command::Players => {
                for (i, name) in manager.participants().iter().enumerate() {
                    println!("{:>3}. {name}", i + 1);
                }
            }
            Command::Config(change) => {
                if let Some(title) = change.title {
                    manager.set_title(&title);
                }
                if let Some(mode) = change.mode {
                    manager.set_mode(mode)?;
                }
                if let Some(rounds) = change.rounds {
                    manager.set_rounds_total(rounds)?;
                }
                if let Some(tables) = change.tables {
                    manager.set_table_sizes(tables)?;
                }
                if change.fix {
                    manager.fix_table_pattern()?;
                }
                let config = manager.config();
                println!("Title:  {}", manager.title());
                println!("Mode:   {}", manager.mode());
                println!("Rounds: {}", config.rounds_total);
                match &config.table_sizes {
                    Some(sizes) => println!("Tables: {sizes:?}"),
                    None => println!("Tables: derived from roster"),
                }
            }
            Command::Generate => {
                let pending = manager.generate_round()?;
                print_pending(pending);
            }
            Command::ManualStart => {
                let manual = manager.begin_manual_round()?;
                self.store.save_manual(&manual)?;
                println!("Manual pairing started for {} player(s)", manual.unplaced().len());
            }
            Command::Pair(first, second) => {
                let mut manual = load_manual(&self.store)?;
                manual.pair(&first, &second)?;
                self.store.save_manual(&manual)?;
                println!("Unplaced: {}", manual.unplaced().join(", "));
            }
            Command::Bye(name) => {
                let mut manual = load_manual(&self.store)?;
                manual.bye(&name)?;
                self.store.save_manual(&manual)?;
                println!("Unplaced: {}", manual.unplaced().join(", "));
            }
            Command::ManualUndo => {
                let mut manual = load_manual(&self.store)?;
                match manual.undo() {
                    Some(table) => println!("Removed {}", table.labels().join(" vs ")),
                    None => println!("Nothing to undo"),
                }
                self.store.save_manual(&manual)?;
            }
            Command::ManualConfirm => {
                let manual = load_manual(&self.store)?;
                let pending = manager.submit_manual_round(manual)?;
                print_pending(pending);
                self.store.clear_manual()?;
            }
            Command::Place(table, rank, entry) => {
                manager.select_placement(
                    index(table, "table")?,
                    index(rank, "rank")?,
                    index(entry, "entry")?,
                )?;
                print_phase(manager);
            }
            Command::Unplace(table, rank) => {
                manager.clear_placement(index(table, "table")?, index(rank, "rank")?)?;
                print_phase(manager);
            }
            Command::Show => print_phase(manager),
            Command::Save => {
                let outcome = manager.save_results()?;
                println!(
                    "Round {} saved ({} points awarded)",
                    outcome.record.round,
                    outcome.record.points_distributed()
                );
                print_standings(&outcome.standings.rows);
                if let Some(report) = &outcome.export {
                    let path = write_export(report, &self.config.export_dir, manager.title())
                        .context("final round saved but the results CSV was not written; run `export` to retry")?;
                    println!("Final round saved; results exported to {}", path.display());
                }
            }
            Command::Discard => {
                manager.discard_round()?;
                println!("Pending round discarded");
            }
            Command::Recover(Recovery::Discard) => {
                manager.recover_by_discarding()?;
                println!("Pending round discarded");
            }
            Command::Recover(Recovery::Restore) => {
                let snapshot = self
                    .store
                    .pairings()?
                    .context("no published pairings to restore; use `recover discard`")?;
                let pending = manager.recover_from_snapshot(&snapshot)?;
                print_pending(pending);
            }
            Command::Standings => print_standings(&manager.standings()),
            Command::Rounds => {
                for (round, points) in manager.round_details() {
                    println!("Round {round}");
                    for p in points {
                        println!("  {:<24} {:>2}", p.name, p.points);
                    }
                }
            }
            Command::Export(file) => {
                let report = manager.export();
                let path = match file {
                    Some(path) => {
                        write_export_to(&report, &path)?;
                        path
                    }
                    None => write_export(&report, &self.config.export_dir, manager.title())?,
                };
                println!("Exported {} result row(s) to {}", report.detail.len(), path.display());
            }
            Command::ClearRounds => {
                manager.clear_rounds();
                self.store.clear_manual()?;
                println!("Round log cleared");
            }
            Command::Reset => {
                manager.reset();
                self.store.clear_manual()?;
                println!("Tournament reset");
            }
        }
        info!("Command applied; {} round(s) saved", self.manager.rounds_saved());
        Ok(())
    }
}

fn load_manual(store: &Store) -> Result<ManualPairing> {
    store
        .manual()?
        .context("no manual pairing in progress; run `manual-start` first")
}

fn print_phase(manager: &TournamentManager) {
    match manager.phase() {
        RoundPhase::Idle => println!(
            "No round pending ({} of {} saved)",
            manager.rounds_saved(),
            manager.config().rounds_total
        ),
        RoundPhase::Pending(pending) => print_pending(pending),
        RoundPhase::Orphaned => println!(
            "A round is pending but its tables were lost; run `recover discard` or `recover restore`"
        ),
    }
}

fn print_pending(pending: &PendingRound) {
    println!("{}", pending.title);
    if let Some(notice) = &pending.notice {
        println!("Note: {notice}");
    }
    for (i, (table, placement)) in pending.tables.iter().zip(&pending.placements).enumerate() {
        println!("Table {}", i + 1);
        for (e, label) in table.labels().iter().enumerate() {
            println!("  {}. {label}", e + 1);
        }
        let ranks: Vec<String> = placement
            .ranks()
            .iter()
            .map(|slot| match slot {
                Some(entry) => (entry + 1).to_string(),
                None => "-".to_string(),
            })
            .collect();
        println!("  ranks: {}", ranks.join(" "));
    }
}

fn print_standings(rows: &[Standing]) {
    println!(
        "{:>3}  {:<24} {:>6} {:>6} {:>5} {:>6} {:>6}",
        "#", "Player", "Points", "OMW%", "Wins", "PRF%", "Rounds"
    );
    for (i, s) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:<24} {:>6} {:>6} {:>5} {:>6} {:>6}",
            i + 1,
            s.name,
            s.points,
            round_percent(s.omw),
            s.wins,
            round_percent(s.prf),
            s.rounds_played
        );
    }
}
