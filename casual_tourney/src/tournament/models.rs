//! Tournament data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, slice};

use super::errors::{TournamentError, TournamentResult};
use crate::scoring::Placement;

/// Prefix of a team label
pub const TEAM_PREFIX: &str = "Team: ";

/// Separator between teammates in a team label
pub const TEAM_SEPARATOR: &str = " & ";

/// Suffix of a team seated without an opposing team
pub const NO_OPPONENT_SUFFIX: &str = " (no opponent)";

/// Suffix of a 1-vs-1 participant sitting out the round
pub const BYE_SUFFIX: &str = " (bye)";

/// Default number of rounds for a new tournament
pub const DEFAULT_ROUNDS_TOTAL: u32 = 3;

/// Tournament format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Every table plays free-for-all, 3-4 seats preferred
    #[serde(rename = "ffa")]
    FreeForAll,
    /// Two-player teams, two teams per table
    #[serde(rename = "two-heads")]
    TwoPlayerTeam,
    /// Head-to-head matches
    #[serde(rename = "one-vs-one")]
    OneVsOne,
}

impl Mode {
    /// Minimum roster size before a round can be seeded
    pub fn min_participants(self) -> usize {
        match self {
            Mode::FreeForAll => 3,
            Mode::TwoPlayerTeam => 4,
            Mode::OneVsOne => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::FreeForAll => "ffa",
            Mode::TwoPlayerTeam => "two-heads",
            Mode::OneVsOne => "one-vs-one",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ffa" | "multi" | "free-for-all" => Ok(Mode::FreeForAll),
            "two-heads" | "2heads" | "teams" => Ok(Mode::TwoPlayerTeam),
            "one-vs-one" | "1v1" | "1vs1" => Ok(Mode::OneVsOne),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// One seat at a table: a single player, a team, or a bye
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Player {
        name: String,
    },
    /// One or two teammates; `unopposed` marks the leftover team sitting alone
    Team {
        members: Vec<String>,
        unopposed: bool,
    },
    Bye {
        name: String,
    },
}

impl Entry {
    pub fn player(name: impl Into<String>) -> Self {
        Entry::Player { name: name.into() }
    }

    pub fn team(members: &[String], unopposed: bool) -> Self {
        Entry::Team {
            members: members.to_vec(),
            unopposed,
        }
    }

    pub fn bye(name: impl Into<String>) -> Self {
        Entry::Bye { name: name.into() }
    }

    /// Individual participants credited for this entry
    pub fn members(&self) -> &[String] {
        match self {
            Entry::Player { name } | Entry::Bye { name } => slice::from_ref(name),
            Entry::Team { members, .. } => members,
        }
    }

    /// Display label, as shown on pairing screens and in exports
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Player { name } => write!(f, "{name}"),
            Entry::Team { members, unopposed } => {
                write!(f, "{TEAM_PREFIX}{}", members.join(TEAM_SEPARATOR))?;
                if *unopposed {
                    write!(f, "{NO_OPPONENT_SUFFIX}")?;
                }
                Ok(())
            }
            Entry::Bye { name } => write!(f, "{name}{BYE_SUFFIX}"),
        }
    }
}

/// One grouping of entries competing together in a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    entries: Vec<Entry>,
}

impl Table {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Free-for-all or 1-vs-1 table of plain players
    pub fn of_players<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(names.iter().map(|n| Entry::player(n.as_ref())).collect())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every individual participant seated here
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.members().iter().map(String::as_str))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(Entry::label).collect()
    }
}

/// One scored placement at one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Table number (1-based)
    pub table: usize,
    /// Rank (1-based)
    pub rank: usize,
    /// Entry label as displayed
    pub participant: String,
    /// Participants credited with the points (teams are split into members)
    pub players: Vec<String>,
    pub points: u32,
    pub is_win: bool,
}

/// A saved round; never edited once appended to the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-based, gapless)
    pub round: u32,
    pub title: String,
    pub mode: Mode,
    pub created_at: DateTime<Utc>,
    pub tables: Vec<Table>,
    pub placements: Vec<Placement>,
    /// Derived from `tables` and `placements`
    pub rows: Vec<ScoreRow>,
}

impl RoundRecord {
    /// Build a record, deriving score rows from the placements
    pub fn new(
        round: u32,
        title: &str,
        mode: Mode,
        created_at: DateTime<Utc>,
        tables: Vec<Table>,
        placements: Vec<Placement>,
    ) -> Self {
        let rows = tables
            .iter()
            .zip(placements.iter())
            .enumerate()
            .flat_map(|(index, (table, placement))| {
                crate::scoring::score_placements(index, table, placement)
            })
            .collect();

        Self {
            round,
            title: title.to_string(),
            mode,
            created_at,
            tables,
            placements,
            rows,
        }
    }

    /// Total points distributed in this round
    pub fn points_distributed(&self) -> u32 {
        self.rows.iter().map(|r| r.points).sum()
    }
}

/// Cumulative standing of one participant, derived from the round log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub rounds_played: u32,
    /// Performance rate factor (0..1)
    pub prf: f64,
    /// Opponent match-win average (0..1)
    pub omw: f64,
}

impl Standing {
    /// Ranking order: points, OMW, wins, PRF (all descending), then name
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.omw.total_cmp(&self.omw))
            .then_with(|| other.wins.cmp(&self.wins))
            .then_with(|| other.prf.total_cmp(&self.prf))
            .then_with(|| {
                self.name
                    .to_lowercase()
                    .cmp(&other.name.to_lowercase())
                    .then_with(|| self.name.cmp(&other.name))
            })
    }

    pub fn omw_percent(&self) -> f64 {
        round_percent(self.omw)
    }

    pub fn prf_percent(&self) -> f64 {
        round_percent(self.prf)
    }
}

/// Fraction to percentage with one decimal place (0.6734 -> 67.3)
pub fn round_percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Number of rounds to play
    pub rounds_total: u32,
    /// Table sizes reused every free-for-all round; derived from the roster when absent
    pub table_sizes: Option<Vec<usize>>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds_total: DEFAULT_ROUNDS_TOTAL,
            table_sizes: None,
        }
    }
}

impl TournamentConfig {
    pub fn new(rounds_total: u32) -> Self {
        Self {
            rounds_total,
            table_sizes: None,
        }
    }

    /// Use a fixed table size pattern instead of deriving one
    pub fn with_table_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.table_sizes = Some(sizes);
        self
    }

    pub fn validate(&self) -> TournamentResult<()> {
        if self.rounds_total == 0 {
            return Err(TournamentError::InvalidRoundsTotal);
        }
        if let Some(sizes) = &self.table_sizes {
            validate_table_sizes(sizes)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_table_sizes(sizes: &[usize]) -> TournamentResult<()> {
    if sizes.is_empty() {
        return Err(TournamentError::InvalidTablePattern(
            "pattern is empty".to_string(),
        ));
    }
    if sizes.contains(&0) {
        return Err(TournamentError::InvalidTablePattern(
            "table sizes must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Current pairings, published for secondary displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSnapshot {
    pub title: String,
    pub mode: Mode,
    pub tables: Vec<Table>,
    pub generated_at: DateTime<Utc>,
}

/// Current standings, published after each save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<Standing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entry_labels() {
        assert_eq!(Entry::player("Ana").label(), "Ana");
        assert_eq!(Entry::bye("Ana").label(), "Ana (bye)");
        assert_eq!(
            Entry::team(&names(&["Ana", "Bruno"]), false).label(),
            "Team: Ana & Bruno"
        );
        assert_eq!(
            Entry::team(&names(&["Ana", "Bruno"]), true).label(),
            "Team: Ana & Bruno (no opponent)"
        );
    }

    #[test]
    fn test_entry_members() {
        assert_eq!(Entry::bye("Ana").members(), ["Ana".to_string()]);
        let team = Entry::team(&names(&["Ana", "Bruno"]), true);
        assert_eq!(team.members(), names(&["Ana", "Bruno"]).as_slice());
    }

    #[test]
    fn test_table_players_expands_teams() {
        let table = Table::new(vec![
            Entry::team(&names(&["A", "B"]), false),
            Entry::team(&names(&["C", "D"]), false),
        ]);
        let players: Vec<&str> = table.players().collect();
        assert_eq!(players, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("ffa".parse::<Mode>(), Ok(Mode::FreeForAll));
        assert_eq!("1v1".parse::<Mode>(), Ok(Mode::OneVsOne));
        assert_eq!("Two-Heads".parse::<Mode>(), Ok(Mode::TwoPlayerTeam));
        assert!("chess".parse::<Mode>().is_err());
    }

    #[test]
    fn test_ranking_order() {
        let base = Standing {
            name: "B".to_string(),
            points: 8,
            wins: 1,
            rounds_played: 2,
            prf: 0.5,
            omw: 0.5,
        };
        let more_points = Standing {
            name: "Z".to_string(),
            points: 9,
            ..base.clone()
        };
        let better_omw = Standing {
            name: "Y".to_string(),
            omw: 0.6,
            ..base.clone()
        };
        let more_wins = Standing {
            name: "X".to_string(),
            wins: 2,
            ..base.clone()
        };
        let better_prf = Standing {
            name: "W".to_string(),
            prf: 0.6,
            ..base.clone()
        };
        let earlier_name = Standing {
            name: "a".to_string(),
            ..base.clone()
        };

        let mut rows = vec![
            base.clone(),
            earlier_name,
            better_prf,
            more_wins,
            better_omw,
            more_points,
        ];
        rows.sort_by(Standing::ranking_cmp);
        let order: Vec<&str> = rows.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["Z", "Y", "X", "W", "a", "B"]);
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(0.6734), 67.3);
        assert_eq!(round_percent(0.415), 41.5);
        assert_eq!(round_percent(0.0), 0.0);
        assert_eq!(round_percent(1.0), 100.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(TournamentConfig::default().validate().is_ok());
        assert!(matches!(
            TournamentConfig::new(0).validate(),
            Err(TournamentError::InvalidRoundsTotal)
        ));
        assert!(matches!(
            TournamentConfig::new(3).with_table_sizes(vec![4, 0]).validate(),
            Err(TournamentError::InvalidTablePattern(_))
        ));
    }
}
