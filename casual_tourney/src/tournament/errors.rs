//! Tournament error types.

use thiserror::Error;

use super::models::Mode;

/// Tournament errors
///
/// Every variant is recoverable: the engine rejects the operation and leaves its
/// state exactly as it was before the call.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("not enough participants for {mode}: need {needed}, have {current}")]
    NotEnoughParticipants {
        mode: Mode,
        needed: usize,
        current: usize,
    },

    #[error("a round is already pending; save or discard it first")]
    RoundAlreadyPending,

    #[error("no round is pending")]
    NoPendingRound,

    #[error("all {total} configured rounds have been played")]
    RoundsExhausted { total: u32 },

    #[error("select at least one result before saving")]
    NoPlacementsSelected,

    #[error("table {table}: entry {entry} holds more than one rank")]
    DuplicateRankInTable { table: usize, entry: usize },

    #[error("manual pairing incomplete: {} participant(s) unplaced", unplaced.len())]
    IncompleteManualSeeding { unplaced: Vec<String> },

    #[error("manual seeding is not available in {0} mode")]
    ManualSeedingUnsupported(Mode),

    #[error("participant already registered: {0}")]
    DuplicateParticipant(String),

    #[error("participant name is empty")]
    EmptyParticipantName,

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("participant already placed at a table: {0}")]
    ParticipantAlreadyPlaced(String),

    #[error("table {0} does not exist")]
    InvalidTableIndex(usize),

    #[error("rank {rank} is not available at a table of {entries} entries")]
    InvalidRank { rank: usize, entries: usize },

    #[error("entry {entry} does not exist at a table of {entries} entries")]
    InvalidEntryIndex { entry: usize, entries: usize },

    #[error("invalid table size pattern: {0}")]
    InvalidTablePattern(String),

    #[error("rounds total must be at least 1")]
    InvalidRoundsTotal,

    #[error("no orphaned pending round to recover")]
    NothingToRecover,

    #[error("pairing snapshot holds no tables")]
    EmptySnapshot,

    #[error("pairing snapshot is for {snapshot} but the tournament is {current}")]
    SnapshotModeMismatch { snapshot: Mode, current: Mode },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TournamentError {
    /// Short operator-facing message
    ///
    /// Validation errors read fine as-is; the few that carry internal detail are
    /// collapsed into a plain instruction.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::NotEnoughParticipants { .. } => {
                "not enough registered players".to_string()
            }
            TournamentError::IncompleteManualSeeding { unplaced } => {
                format!("players still to pair: {}", unplaced.join(", "))
            }
            TournamentError::Csv(_) => "could not build the export".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_enough_participants_message() {
        let err = TournamentError::NotEnoughParticipants {
            mode: Mode::TwoPlayerTeam,
            needed: 4,
            current: 3,
        };
        assert_eq!(
            err.to_string(),
            "not enough participants for two-heads: need 4, have 3"
        );
        assert_eq!(err.client_message(), "not enough registered players");
    }

    #[test]
    fn test_incomplete_manual_seeding_lists_names() {
        let err = TournamentError::IncompleteManualSeeding {
            unplaced: vec!["Ana".to_string(), "Bruno".to_string()],
        };
        assert!(err.to_string().contains("2 participant(s)"));
        assert_eq!(err.client_message(), "players still to pair: Ana, Bruno");
    }
}
