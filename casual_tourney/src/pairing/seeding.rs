//! Round seeding: turning an ordered roster into tables.
//!
//! Round 1 is shuffled; later rounds follow the current standings so that players
//! of similar rank share tables. Repeat opponents are not avoided.

use log::{debug, info};

use super::{partition::partition, shuffler::SeatShuffler};
use crate::tournament::{Entry, Mode, Standing, Table, TournamentError, TournamentResult};

/// Tables for one round plus an advisory notice for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRound {
    pub tables: Vec<Table>,
    pub notice: Option<String>,
}

/// Produces table assignments for every mode
#[derive(Debug, Clone, Default)]
pub struct RoundSeeder {
    shuffler: SeatShuffler,
}

impl RoundSeeder {
    pub fn new(shuffler: SeatShuffler) -> Self {
        Self { shuffler }
    }

    /// Seed a round
    ///
    /// With `standings` absent the roster is shuffled (round 1); otherwise it is
    /// ordered by rank. `pattern` only applies to free-for-all and is derived from the
    /// roster size when empty.
    ///
    /// # Errors
    ///
    /// `NotEnoughParticipants` when the roster is below the mode minimum.
    pub fn seed(
        &mut self,
        mode: Mode,
        participants: &[String],
        pattern: &[usize],
        standings: Option<&[Standing]>,
    ) -> TournamentResult<SeededRound> {
        ensure_enough(mode, participants.len())?;

        let ordered = match standings {
            None => self.shuffler.shuffled(participants),
            Some(standings) => rank_order(standings, participants),
        };
        let seeded = group_tables(mode, &ordered, pattern);
        info!(
            "Seeded {} table(s) for {} participant(s) in {} mode ({})",
            seeded.tables.len(),
            participants.len(),
            mode,
            if standings.is_some() { "by standings" } else { "random" }
        );
        Ok(seeded)
    }
}

pub(crate) fn ensure_enough(mode: Mode, current: usize) -> TournamentResult<()> {
    let needed = mode.min_participants();
    if current < needed {
        return Err(TournamentError::NotEnoughParticipants {
            mode,
            needed,
            current,
        });
    }
    Ok(())
}

/// Roster ordered by current ranking
///
/// Standings rows for players no longer registered are skipped; registered players
/// missing from the standings follow in roster order.
pub fn rank_order(standings: &[Standing], participants: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = standings
        .iter()
        .filter(|s| participants.contains(&s.name))
        .map(|s| s.name.clone())
        .collect();
    let unseen: Vec<String> = participants
        .iter()
        .filter(|p| !ordered.contains(p))
        .cloned()
        .collect();
    ordered.extend(unseen);
    ordered
}

/// Slice an already ordered roster into tables for `mode`
pub fn group_tables(mode: Mode, ordered: &[String], pattern: &[usize]) -> SeededRound {
    match mode {
        Mode::FreeForAll => group_free_for_all(ordered, pattern),
        Mode::TwoPlayerTeam => group_teams(ordered),
        Mode::OneVsOne => group_head_to_head(ordered),
    }
}

fn group_free_for_all(ordered: &[String], pattern: &[usize]) -> SeededRound {
    let derived;
    let pattern: &[usize] = if pattern.is_empty() {
        derived = partition(ordered.len());
        &derived
    } else {
        pattern
    };

    let mut tables = Vec::new();
    let mut notices = Vec::new();
    let mut rest = ordered;
    for &size in pattern {
        if rest.is_empty() {
            break;
        }
        let (group, tail) = rest.split_at(size.min(rest.len()));
        tables.push(Table::of_players(group));
        rest = tail;
    }
    if !rest.is_empty() {
        tables.push(Table::of_players(rest));
        notices.push("a table was added to seat every participant".to_string());
    }
    if let Some(odd) = tables.iter().find(|t| t.len() != 3 && t.len() != 4) {
        notices.push(format!(
            "a table of {} players was created by size adjustment",
            odd.len()
        ));
    }

    debug!("Free-for-all pattern {pattern:?} produced {} table(s)", tables.len());
    SeededRound {
        tables,
        notice: join_notices(notices),
    }
}

fn group_teams(ordered: &[String]) -> SeededRound {
    let teams: Vec<&[String]> = ordered.chunks(2).collect();
    let mut notice = None;
    let tables = teams
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => Table::new(vec![Entry::team(a, false), Entry::team(b, false)]),
            [lone] => {
                notice = Some("odd number of teams: one table seats a single team".to_string());
                Table::new(vec![Entry::team(lone, true)])
            }
            _ => unreachable!("chunks(2) yields one or two teams"),
        })
        .collect();

    SeededRound { tables, notice }
}

fn group_head_to_head(ordered: &[String]) -> SeededRound {
    let mut notice = None;
    let tables = ordered
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => Table::new(vec![Entry::player(a), Entry::player(b)]),
            [lone] => {
                notice = Some(format!("odd number of players: {lone} receives a bye"));
                Table::new(vec![Entry::bye(lone)])
            }
            _ => unreachable!("chunks(2) yields one or two players"),
        })
        .collect();

    SeededRound { tables, notice }
}

fn join_notices(notices: Vec<String>) -> Option<String> {
    if notices.is_empty() {
        None
    } else {
        Some(notices.join("; "))
    }
}
