//! Command-line host for casual multi-round tournaments.
//!
//! Keeps the roster, round log and published snapshots as JSON files in a data
//! directory and applies one operator command per invocation.

mod commands;
mod config;
mod logging;
mod publisher;
mod store;

use anyhow::Error;
use casual_tourney::TournamentError;
use log::{debug, error};
use pico_args::Arguments;
use std::path::PathBuf;

use commands::{Command, Session};
use config::HostConfig;

const HELP: &str = "\
Run a casual tournament from the command line

USAGE:
  ct_host <COMMAND> [ARGS] [OPTIONS]

COMMANDS:
  add NAME                 Register a participant
  remove NAME              Unregister a participant
  players                  List participants
  config [--title T] [--mode M] [--rounds N] [--tables 4,4,3|auto] [--fix]
                           Show or change tournament settings
  generate                 Seed the next round
  manual-start             Start hand-pairing a 1-vs-1 round
  pair A B                 Seat A against B
  bye NAME                 Give NAME a bye
  manual-undo              Remove the last hand-built table
  manual-confirm           Accept the hand-built round
  place TABLE RANK ENTRY   Record ENTRY finishing at RANK (all 1-based)
  unplace TABLE RANK       Clear a rank
  show                     Show the pending round
  save                     Score the pending round
  discard                  Drop the pending round
  recover discard|restore  Resolve a pending round whose tables were lost
  standings                Show current standings
  rounds                   Show points per round
  export [FILE]            Write the results CSV
  clear-rounds             Clear the round log
  reset                    Clear everything

OPTIONS:
  --data-dir   DIR         Directory for tournament data  [default: env CT_DATA_DIR or ./tourney-data]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  CT_DATA_DIR              Directory for tournament data
  CT_EXPORT_DIR            Directory for result CSV files [default: data directory]
  CT_TITLE                 Title of a new tournament
  CT_MODE                  ffa, two-heads or one-vs-one
  CT_ROUNDS                Rounds of a new tournament [default: 3]
  RUST_LOG                 Log filter [default: info]
";

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<TournamentError>() {
            Some(err) => error!("{}", err.client_message()),
            None => error!("{e:#}"),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    logging::init();

    let command = Command::parse(&mut pargs)?;
    let data_dir: Option<PathBuf> = pargs.opt_value_from_str("--data-dir")?;
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("unexpected arguments: {remaining:?}");
    }

    let config = HostConfig::from_env(data_dir)?;
    debug!("Using data directory {}", config.data_dir.display());

    let mut session = Session::open(config)?;
    // Failed commands leave the tournament untouched, except a final save whose
    // export failed, which must still be kept
    let outcome = session.run(command);
    session.persist()?;
    outcome
}
