//! Export projection: round results followed by a standings summary.

use chrono::{DateTime, Utc};
use csv::{Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::tournament::{Mode, RoundRecord, Standing, TournamentResult, round_percent};

/// Column labels of the detail block
pub const DETAIL_HEADER: [&str; 9] = [
    "Round",
    "Title",
    "Mode",
    "Table",
    "Rank",
    "Participant",
    "Points",
    "Win",
    "Timestamp",
];

/// Column labels of the summary block
pub const SUMMARY_HEADER: [&str; 6] = ["Player", "Points", "OMW%", "Wins", "PRF%", "Rounds"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STEM_MAX: usize = 50;

/// One scored placement of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub round: u32,
    pub title: String,
    pub mode: Mode,
    pub table: usize,
    pub rank: usize,
    pub participant: String,
    pub points: u32,
    pub is_win: bool,
    pub timestamp: DateTime<Utc>,
}

/// One standings line, percentages already rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub rank: usize,
    pub name: String,
    pub points: u32,
    pub omw_pct: f64,
    pub wins: u32,
    pub prf_pct: f64,
    pub rounds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub detail: Vec<ExportRow>,
    pub summary: Vec<SummaryRow>,
}

/// Flatten `records` in round order and append `standings` as the summary
///
/// `standings` is expected in ranking order; summary ranks follow that order.
pub fn project(records: &[RoundRecord], standings: &[Standing]) -> ExportReport {
    let mut ordered: Vec<&RoundRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.round);

    let detail = ordered
        .into_iter()
        .flat_map(|record| {
            record.rows.iter().map(move |row| ExportRow {
                round: record.round,
                title: record.title.clone(),
                mode: record.mode,
                table: row.table,
                rank: row.rank,
                participant: row.participant.clone(),
                points: row.points,
                is_win: row.is_win,
                timestamp: record.created_at,
            })
        })
        .collect();

    let summary = standings
        .iter()
        .enumerate()
        .map(|(i, s)| SummaryRow {
            rank: i + 1,
            name: s.name.clone(),
            points: s.points,
            omw_pct: round_percent(s.omw),
            wins: s.wins,
            prf_pct: round_percent(s.prf),
            rounds: s.rounds_played,
        })
        .collect();

    ExportReport { detail, summary }
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.detail.is_empty() && self.summary.is_empty()
    }

    /// Render both blocks as CSV with CRLF line endings, separated by an empty line
    pub fn to_csv(&self) -> TournamentResult<String> {
        let mut detail = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());
        detail.write_record(DETAIL_HEADER)?;
        for row in &self.detail {
            detail.write_record([
                row.round.to_string(),
                row.title.clone(),
                row.mode.to_string(),
                row.table.to_string(),
                row.rank.to_string(),
                row.participant.clone(),
                row.points.to_string(),
                u8::from(row.is_win).to_string(),
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ])?;
        }

        let mut summary = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());
        summary.write_record(SUMMARY_HEADER)?;
        for row in &self.summary {
            summary.write_record([
                row.name.clone(),
                row.points.to_string(),
                row.omw_pct.to_string(),
                row.wins.to_string(),
                row.prf_pct.to_string(),
                row.rounds.to_string(),
            ])?;
        }

        let detail = detail
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        let summary = summary
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;

        let mut out = String::from_utf8_lossy(&detail).into_owned();
        out.push_str("\r\n");
        out.push_str(&String::from_utf8_lossy(&summary));
        Ok(out)
    }
}

/// File name for a tournament's export, e.g. `Friday_Cup_results.csv`
pub fn export_file_name(title: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() { "Tournament" } else { title };

    let mut stem = String::new();
    let mut in_gap = false;
    for c in title.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            stem.push(c);
            in_gap = false;
        } else if !in_gap {
            stem.push('_');
            in_gap = true;
        }
    }
    let stem: String = stem.chars().take(FILE_STEM_MAX).collect();
    format!("{stem}_results.csv")
}
