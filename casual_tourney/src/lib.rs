//! # Casual Tourney
//!
//! Pairing and standings engine for informal, in-person game tournaments played over
//! several rounds in one of three formats: free-for-all tables, two-player teams, or
//! 1-vs-1 matches.
//!
//! The engine is synchronous and performs no I/O. A host supplies the roster and the
//! placements entered by an operator, persists the round log, and forwards the
//! snapshots published through [`tournament::EventSink`].
//!
//! ## Core Modules
//!
//! - [`pairing`]: table partitioning, round seeding and manual 1-vs-1 pairing
//! - [`scoring`]: placement scoring and standings with PRF/OMW tie-breaks
//! - [`tournament`]: round lifecycle, roster, data model and events
//! - [`export`]: flat results report and its CSV rendering
//!
//! ## Round lifecycle
//!
//! A tournament is either idle or holds exactly one pending round. Generating a round
//! while one is pending fails with [`TournamentError::RoundAlreadyPending`], so a set
//! of tables can never be scored twice or skipped.

pub mod export;
pub mod pairing;
pub mod scoring;
pub mod tournament;

pub use export::{ExportReport, ExportRow, SummaryRow, export_file_name};
pub use pairing::{ManualPairing, RoundSeeder, SeatShuffler, partition};
pub use scoring::{POINTS_BY_RANK, Placement, build_standings};
pub use tournament::{
    Entry, Mode, PairingSnapshot, RoundRecord, ScoreRow, Standing, StandingsSnapshot,
    Table, TournamentConfig, TournamentError, TournamentEvent, TournamentManager,
    TournamentResult,
};
