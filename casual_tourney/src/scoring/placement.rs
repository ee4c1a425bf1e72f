//! Placement selection and scoring.

use serde::{Deserialize, Serialize};

use crate::tournament::{Entry, Mode, ScoreRow, Table, TournamentError, TournamentResult};

/// Points awarded by rank: 1st, 2nd, 3rd, 4th
pub const POINTS_BY_RANK: [u32; 4] = [4, 3, 2, 1];

/// Highest rank that can be assigned at any table
pub const MAX_RANKED: usize = POINTS_BY_RANK.len();

/// Rank selections for one table
///
/// Slot `r` holds the index of the entry that finished at rank `r + 1`, or `None`
/// while unset. A table of `n` entries has `min(4, n)` slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    ranks: Vec<Option<usize>>,
}

impl Placement {
    /// Empty placement sized for `table`
    pub fn for_table(table: &Table) -> Self {
        Self {
            ranks: vec![None; table.len().min(MAX_RANKED)],
        }
    }

    /// Build from raw slots; mostly useful for tests and host restores
    pub fn from_ranks(ranks: Vec<Option<usize>>) -> Self {
        Self { ranks }
    }

    pub fn ranks(&self) -> &[Option<usize>] {
        &self.ranks
    }

    /// Entry holding `rank` (0-based)
    pub fn get(&self, rank: usize) -> Option<usize> {
        self.ranks.get(rank).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.iter().all(Option::is_none)
    }

    /// Assign `entry` to `rank` (both 0-based)
    ///
    /// At a two-entry 1-vs-1 table, setting first place fills second place with
    /// the other entry, and keeps it complementary if first place changes later.
    pub fn select(
        &mut self,
        mode: Mode,
        table: &Table,
        rank: usize,
        entry: usize,
    ) -> TournamentResult<()> {
        if rank >= self.ranks.len() {
            return Err(TournamentError::InvalidRank {
                rank: rank + 1,
                entries: table.len(),
            });
        }
        if entry >= table.len() {
            return Err(TournamentError::InvalidEntryIndex {
                entry,
                entries: table.len(),
            });
        }

        self.ranks[rank] = Some(entry);
        if mode == Mode::OneVsOne && table.len() == 2 && rank == 0 {
            self.ranks[1] = Some(1 - entry);
        }
        Ok(())
    }

    /// Unset `rank` (0-based)
    pub fn clear(&mut self, rank: usize) -> TournamentResult<()> {
        let entries = self.ranks.len();
        let slot = self
            .ranks
            .get_mut(rank)
            .ok_or(TournamentError::InvalidRank {
                rank: rank + 1,
                entries,
            })?;
        *slot = None;
        Ok(())
    }

    /// Check that every selected entry exists and holds a single rank
    ///
    /// `table_index` is 0-based; errors report the 1-based table number.
    pub fn validate(&self, table_index: usize, table: &Table) -> TournamentResult<()> {
        let mut seen = vec![false; table.len()];
        for entry in self.ranks.iter().flatten().copied() {
            let slot = seen
                .get_mut(entry)
                .ok_or(TournamentError::InvalidEntryIndex {
                    entry,
                    entries: table.len(),
                })?;
            if *slot {
                return Err(TournamentError::DuplicateRankInTable {
                    table: table_index + 1,
                    entry,
                });
            }
            *slot = true;
        }
        Ok(())
    }
}

/// Convert one table's placement into score rows
///
/// Unset ranks and ranks pointing past the table produce no row. Team entries are
/// credited to each teammate in full.
pub fn score_placements(table_index: usize, table: &Table, placement: &Placement) -> Vec<ScoreRow> {
    placement
        .ranks()
        .iter()
        .zip(POINTS_BY_RANK)
        .enumerate()
        .filter_map(|(rank, (selected, points))| {
            let entry: &Entry = table.entry((*selected)?)?;
            Some(ScoreRow {
                table: table_index + 1,
                rank: rank + 1,
                participant: entry.label(),
                players: entry.members().to_vec(),
                points,
                is_win: rank == 0,
            })
        })
        .collect()
}
