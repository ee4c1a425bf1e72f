//! Cumulative standings and tie-break statistics.
//!
//! Standings are never stored as a source of truth: they are folded from the full
//! round log on every query.
//!
//! - **PRF**: per round, points earned divided by the 4-point maximum; averaged over
//!   the rounds a participant played (0 if none).
//! - **OMW**: mean over distinct opponents of `max(0.33, PRF(opponent))`; 0 without
//!   opponents. Teammates are not opponents.

use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use super::placement::POINTS_BY_RANK;
use crate::tournament::{RoundRecord, Standing};

/// Floor applied to each opponent's PRF when computing OMW
pub const OMW_FLOOR: f64 = 0.33;

/// Best possible points in a single round
const MAX_ROUND_POINTS: f64 = POINTS_BY_RANK[0] as f64;

#[derive(Debug, Default)]
struct Tally {
    points: u32,
    wins: u32,
    rounds_played: u32,
    prf_sum: f64,
    opponents: BTreeSet<String>,
}

/// Points one participant earned in a single round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPoints {
    pub name: String,
    pub points: u32,
}

/// Fold every saved round into ranked standings
///
/// `known` participants appear even when they never played. Names found only in
/// the log (e.g. removed players) are kept too.
pub fn build_standings<S: AsRef<str>>(records: &[RoundRecord], known: &[S]) -> Vec<Standing> {
    let mut tallies: BTreeMap<String, Tally> = known
        .iter()
        .map(|name| (name.as_ref().to_string(), Tally::default()))
        .collect();

    for record in records {
        let mut round_points: BTreeMap<&str, u32> = BTreeMap::new();
        for row in &record.rows {
            for player in &row.players {
                let tally = tallies.entry(player.clone()).or_default();
                tally.points += row.points;
                if row.is_win {
                    tally.wins += 1;
                }
                *round_points.entry(player.as_str()).or_default() += row.points;
            }
        }

        let mut seated: BTreeSet<&str> = BTreeSet::new();
        for table in &record.tables {
            for (index, entry) in table.entries().iter().enumerate() {
                let opponents: Vec<&String> = table
                    .entries()
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .flat_map(|(_, e)| e.members())
                    .collect();
                for player in entry.members() {
                    seated.insert(player);
                    let tally = tallies.entry(player.clone()).or_default();
                    tally.opponents.extend(
                        opponents
                            .iter()
                            .filter(|o| o.as_str() != player.as_str())
                            .map(|o| (*o).clone()),
                    );
                }
            }
        }

        for player in seated {
            tallies.entry(player.to_string()).or_default().rounds_played += 1;
        }
        for (player, points) in round_points {
            tallies.entry(player.to_string()).or_default().prf_sum +=
                f64::from(points) / MAX_ROUND_POINTS;
        }
    }

    let prf: BTreeMap<&str, f64> = tallies
        .iter()
        .map(|(name, tally)| {
            let value = if tally.rounds_played > 0 {
                tally.prf_sum / f64::from(tally.rounds_played)
            } else {
                0.0
            };
            (name.as_str(), value)
        })
        .collect();

    let mut standings: Vec<Standing> = tallies
        .iter()
        .map(|(name, tally)| {
            let omw = if tally.opponents.is_empty() {
                0.0
            } else {
                let sum: f64 = tally
                    .opponents
                    .iter()
                    .map(|o| prf.get(o.as_str()).copied().unwrap_or(0.0).max(OMW_FLOOR))
                    .sum();
                sum / tally.opponents.len() as f64
            };
            Standing {
                name: name.clone(),
                points: tally.points,
                wins: tally.wins,
                rounds_played: tally.rounds_played,
                prf: prf.get(name.as_str()).copied().unwrap_or(0.0),
                omw,
            }
        })
        .collect();

    standings.sort_by(Standing::ranking_cmp);
    debug!(
        "Standings rebuilt from {} round(s) for {} participant(s)",
        records.len(),
        standings.len()
    );
    standings
}

/// Points earned per participant in one round, best first
pub fn round_points(record: &RoundRecord) -> Vec<RoundPoints> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for row in &record.rows {
        for player in &row.players {
            *totals.entry(player.as_str()).or_default() += row.points;
        }
    }

    let mut points: Vec<RoundPoints> = totals
        .into_iter()
        .map(|(name, points)| RoundPoints {
            name: name.to_string(),
            points,
        })
        .collect();
    points.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));
    points
}
