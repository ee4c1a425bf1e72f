//! Tournament lifecycle, roster and shared data model.
//!
//! [`TournamentManager`] owns the participant roster and the append-only round log,
//! and enforces that at most one round is awaiting results at a time.
//!
//! ## Example
//!
//! ```
//! use casual_tourney::tournament::{Mode, TournamentConfig, TournamentManager};
//!
//! let mut manager = TournamentManager::new("Friday Cup", Mode::OneVsOne, TournamentConfig::new(2))?;
//! for name in ["Ana", "Bruno", "Carla", "Dani"] {
//!     manager.add_participant(name)?;
//! }
//!
//! let pending = manager.generate_round()?;
//! assert_eq!(pending.tables.len(), 2);
//!
//! manager.select_placement(0, 0, 0)?;
//! manager.select_placement(1, 0, 1)?;
//! let outcome = manager.save_results()?;
//! assert_eq!(outcome.record.points_distributed(), 14);
//! # Ok::<(), casual_tourney::TournamentError>(())
//! ```

pub mod errors;
pub mod events;
pub mod manager;
pub mod models;
pub mod roster;

pub use errors::{TournamentError, TournamentResult};
pub use events::{ChannelSink, EventSink, TournamentEvent};
pub use manager::{PendingRound, RoundPhase, SaveOutcome, StoredTournament, TournamentManager};
pub use models::{
    BYE_SUFFIX, DEFAULT_ROUNDS_TOTAL, Entry, Mode, NO_OPPONENT_SUFFIX, PairingSnapshot,
    RoundRecord, ScoreRow, Standing, StandingsSnapshot, TEAM_PREFIX, TEAM_SEPARATOR, Table,
    TournamentConfig, round_percent,
};
pub use roster::Roster;
