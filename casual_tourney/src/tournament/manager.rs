//! Tournament manager: roster, round log and the round lifecycle.
//!
//! The lifecycle has two states. `Idle` allows a new round to be generated;
//! `Pending` holds generated tables until results are saved or the round is
//! discarded. A third, transient `Orphaned` state appears only when a host reloads
//! a pending flag without the tables that went with it; the operator then either
//! discards the round or restores the last published pairings.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{
    errors::{TournamentError, TournamentResult},
    events::{EventSink, TournamentEvent},
    models::{
        Mode, PairingSnapshot, RoundRecord, Standing, StandingsSnapshot, Table,
        TournamentConfig, validate_table_sizes,
    },
    roster::Roster,
};
use crate::{
    export::{self, ExportReport},
    pairing::{ManualPairing, RoundSeeder, partition, seeding::ensure_enough, validate_coverage},
    scoring::{Placement, RoundPoints, build_standings, round_points},
};

/// Tables awaiting results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRound {
    /// Round number this will become once saved
    pub round: u32,
    /// Display title, e.g. "Friday Cup - Round 2"
    pub title: String,
    pub tables: Vec<Table>,
    pub placements: Vec<Placement>,
    pub notice: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl PendingRound {
    fn new(round: u32, title: String, tables: Vec<Table>, notice: Option<String>) -> Self {
        let placements = tables.iter().map(Placement::for_table).collect();
        Self {
            round,
            title,
            tables,
            placements,
            notice,
            generated_at: Utc::now(),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.placements.iter().any(|p| !p.is_empty())
    }
}

/// Round lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub enum RoundPhase {
    Idle,
    Pending(PendingRound),
    /// Pending flag set, tables lost
    Orphaned,
}

/// Persisted form of a tournament
///
/// The pending flag and the pending tables are separate fields because hosts
/// usually write them to separate places; a flag without tables is detected on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTournament {
    pub title: String,
    pub mode: Option<Mode>,
    pub config: TournamentConfig,
    pub participants: Vec<String>,
    pub rounds: Vec<RoundRecord>,
    pub pending: bool,
    pub pending_round: Option<PendingRound>,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub record: RoundRecord,
    pub standings: StandingsSnapshot,
    /// Present when the saved round was the last configured one
    pub export: Option<ExportReport>,
}

/// Runs one tournament
pub struct TournamentManager {
    title: String,
    mode: Mode,
    config: TournamentConfig,
    roster: Roster,
    rounds: Vec<RoundRecord>,
    phase: RoundPhase,
    seeder: RoundSeeder,
    sinks: Vec<Box<dyn EventSink>>,
}

impl TournamentManager {
    /// Create a new tournament
    pub fn new(title: &str, mode: Mode, config: TournamentConfig) -> TournamentResult<Self> {
        config.validate()?;
        Ok(Self {
            title: title.trim().to_string(),
            mode,
            config,
            roster: Roster::new(),
            rounds: Vec::new(),
            phase: RoundPhase::Idle,
            seeder: RoundSeeder::default(),
            sinks: Vec::new(),
        })
    }

    /// Rebuild a tournament from its persisted form
    ///
    /// `default_mode` applies when the stored data predates a mode being recorded.
    pub fn from_stored(stored: StoredTournament, default_mode: Mode) -> TournamentResult<Self> {
        stored.config.validate()?;
        let mut rounds = stored.rounds;
        rounds.sort_by_key(|r| r.round);

        let next = rounds.len() as u32 + 1;
        let phase = match (stored.pending, stored.pending_round) {
            (false, _) => RoundPhase::Idle,
            (true, Some(pending)) if !pending.tables.is_empty() && pending.round < next => {
                warn!(
                    "Pending round {} is already in the round log; dropping it",
                    pending.round
                );
                RoundPhase::Idle
            }
            (true, Some(pending)) if !pending.tables.is_empty() && pending.round > next => {
                warn!(
                    "Pending round {} does not follow the {} saved round(s); recovery required",
                    pending.round,
                    rounds.len()
                );
                RoundPhase::Orphaned
            }
            (true, Some(pending)) if !pending.tables.is_empty() => RoundPhase::Pending(pending),
            (true, _) => {
                warn!("Pending round flag set but no tables were stored; recovery required");
                RoundPhase::Orphaned
            }
        };

        Ok(Self {
            title: stored.title,
            mode: stored.mode.unwrap_or(default_mode),
            config: stored.config,
            roster: Roster::from_untrusted(&stored.participants),
            rounds,
            phase,
            seeder: RoundSeeder::default(),
            sinks: Vec::new(),
        })
    }

    /// Persisted form of the current state
    pub fn to_stored(&self) -> StoredTournament {
        let (pending, pending_round) = match &self.phase {
            RoundPhase::Idle => (false, None),
            RoundPhase::Pending(round) => (true, Some(round.clone())),
            RoundPhase::Orphaned => (true, None),
        };
        StoredTournament {
            title: self.title.clone(),
            mode: Some(self.mode),
            config: self.config.clone(),
            participants: self.roster.names().to_vec(),
            rounds: self.rounds.clone(),
            pending,
            pending_round,
        }
    }

    /// Replace the seeder, e.g. with a seeded shuffler for reproducible draws
    pub fn with_seeder(mut self, seeder: RoundSeeder) -> Self {
        self.seeder = seeder;
        self
    }

    /// Register a receiver for round and standings notifications
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn participants(&self) -> &[String] {
        self.roster.names()
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn pending_round(&self) -> Option<&PendingRound> {
        match &self.phase {
            RoundPhase::Pending(round) => Some(round),
            _ => None,
        }
    }

    /// Whether a round blocks generation (pending or orphaned)
    pub fn is_pending(&self) -> bool {
        !matches!(self.phase, RoundPhase::Idle)
    }

    pub fn needs_recovery(&self) -> bool {
        matches!(self.phase, RoundPhase::Orphaned)
    }

    pub fn rounds_saved(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.rounds_saved() >= self.config.rounds_total
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.trim().to_string();
    }

    /// Switch format for the next round; saved rounds keep the mode they were played in
    pub fn set_mode(&mut self, mode: Mode) -> TournamentResult<()> {
        if self.is_pending() {
            return Err(TournamentError::RoundAlreadyPending);
        }
        if self.mode != mode {
            info!("Mode changed from {} to {mode}", self.mode);
            self.mode = mode;
        }
        Ok(())
    }

    pub fn add_participant(&mut self, name: &str) -> TournamentResult<String> {
        let name = self.roster.add(name)?;
        info!("Registered participant {name}");
        Ok(name)
    }

    pub fn remove_participant(&mut self, name: &str) -> TournamentResult<String> {
        let name = self.roster.remove(name)?;
        info!("Removed participant {name}");
        Ok(name)
    }

    pub fn clear_participants(&mut self) {
        self.roster.clear();
    }

    pub fn set_rounds_total(&mut self, rounds_total: u32) -> TournamentResult<()> {
        if rounds_total == 0 {
            return Err(TournamentError::InvalidRoundsTotal);
        }
        self.config.rounds_total = rounds_total;
        Ok(())
    }

    /// Fix the free-for-all table pattern; `None` derives it again at the next round
    pub fn set_table_sizes(&mut self, sizes: Option<Vec<usize>>) -> TournamentResult<()> {
        if let Some(sizes) = &sizes {
            validate_table_sizes(sizes)?;
        }
        self.config.table_sizes = sizes;
        Ok(())
    }

    /// Derive the pattern from the current roster and keep it for every round
    pub fn fix_table_pattern(&mut self) -> TournamentResult<Vec<usize>> {
        let sizes = partition(self.roster.len());
        validate_table_sizes(&sizes)?;
        self.config.table_sizes = Some(sizes.clone());
        info!("Table pattern fixed at {sizes:?}");
        Ok(sizes)
    }

    /// Seed the next round and move to `Pending`
    ///
    /// # Errors
    ///
    /// - `RoundAlreadyPending` while a round awaits results
    /// - `RoundsExhausted` once every configured round is saved
    /// - `NotEnoughParticipants` below the mode minimum
    pub fn generate_round(&mut self) -> TournamentResult<&PendingRound> {
        self.ensure_can_generate()?;

        let participants = self.roster.names().to_vec();
        let pattern = match (&self.config.table_sizes, self.mode) {
            (Some(sizes), _) => sizes.clone(),
            (None, Mode::FreeForAll) => partition(participants.len()),
            (None, _) => Vec::new(),
        };
        let standings = if self.rounds.is_empty() {
            None
        } else {
            Some(self.standings())
        };

        let seeded = self
            .seeder
            .seed(self.mode, &participants, &pattern, standings.as_deref())?;

        if self.mode == Mode::FreeForAll && self.config.table_sizes.is_none() {
            self.config.table_sizes = Some(pattern);
        }
        self.install_pending(seeded.tables, seeded.notice)
    }

    /// Start building a 1-vs-1 round by hand
    pub fn begin_manual_round(&self) -> TournamentResult<ManualPairing> {
        if self.mode != Mode::OneVsOne {
            return Err(TournamentError::ManualSeedingUnsupported(self.mode));
        }
        self.ensure_can_generate()?;
        Ok(ManualPairing::new(self.roster.names()))
    }

    /// Accept a hand-built 1-vs-1 round as the pending round
    ///
    /// # Errors
    ///
    /// `IncompleteManualSeeding` unless every registered participant is seated once.
    pub fn submit_manual_round(&mut self, manual: ManualPairing) -> TournamentResult<&PendingRound> {
        if self.mode != Mode::OneVsOne {
            return Err(TournamentError::ManualSeedingUnsupported(self.mode));
        }
        self.ensure_can_generate()?;

        let tables = manual.confirm()?;
        validate_coverage(self.roster.names(), &tables)?;
        self.install_pending(tables, None)
    }

    fn ensure_can_generate(&self) -> TournamentResult<()> {
        if self.is_pending() {
            warn!("Rejected round generation: a round is already pending");
            return Err(TournamentError::RoundAlreadyPending);
        }
        if self.is_complete() {
            return Err(TournamentError::RoundsExhausted {
                total: self.config.rounds_total,
            });
        }
        ensure_enough(self.mode, self.roster.len())
    }

    fn install_pending(
        &mut self,
        tables: Vec<Table>,
        notice: Option<String>,
    ) -> TournamentResult<&PendingRound> {
        let round = self.rounds_saved() + 1;
        let title = format!("{} - Round {round}", self.title);
        let pending = PendingRound::new(round, title, tables, notice);
        info!(
            "Round {round} pending with {} table(s)",
            pending.tables.len()
        );

        let snapshot = pairing_snapshot(self.mode, &pending);
        self.phase = RoundPhase::Pending(pending);
        self.publish(TournamentEvent::RoundSeeded(snapshot));

        self.pending_round().ok_or(TournamentError::NoPendingRound)
    }

    /// Record `entry` at `rank` on `table` (all 0-based)
    pub fn select_placement(
        &mut self,
        table: usize,
        rank: usize,
        entry: usize,
    ) -> TournamentResult<()> {
        let mode = self.mode;
        let pending = self.pending_mut()?;
        let (Some(seated), Some(placement)) =
            (pending.tables.get(table), pending.placements.get_mut(table))
        else {
            return Err(TournamentError::InvalidTableIndex(table));
        };
        placement.select(mode, seated, rank, entry)
    }

    /// Unset `rank` on `table` (both 0-based)
    pub fn clear_placement(&mut self, table: usize, rank: usize) -> TournamentResult<()> {
        let pending = self.pending_mut()?;
        pending
            .placements
            .get_mut(table)
            .ok_or(TournamentError::InvalidTableIndex(table))?
            .clear(rank)
    }

    fn pending_mut(&mut self) -> TournamentResult<&mut PendingRound> {
        match &mut self.phase {
            RoundPhase::Pending(round) => Ok(round),
            _ => Err(TournamentError::NoPendingRound),
        }
    }

    /// Score the pending round, append it to the log and return to `Idle`
    ///
    /// # Errors
    ///
    /// `NoPlacementsSelected` or `DuplicateRankInTable`; the round stays pending.
    pub fn save_results(&mut self) -> TournamentResult<SaveOutcome> {
        let pending = self.pending_round().ok_or(TournamentError::NoPendingRound)?;
        if !pending.has_selection() {
            return Err(TournamentError::NoPlacementsSelected);
        }
        for (index, (table, placement)) in
            pending.tables.iter().zip(&pending.placements).enumerate()
        {
            placement.validate(index, table)?;
        }

        let pending = match std::mem::replace(&mut self.phase, RoundPhase::Idle) {
            RoundPhase::Pending(pending) => pending,
            other => {
                self.phase = other;
                return Err(TournamentError::NoPendingRound);
            }
        };
        let record = RoundRecord::new(
            self.rounds_saved() + 1,
            &self.title,
            self.mode,
            Utc::now(),
            pending.tables,
            pending.placements,
        );
        let points = record.points_distributed();
        info!("Round {} saved: {points} points awarded", record.round);
        self.rounds.push(record.clone());

        let standings = self.standings_snapshot();
        self.publish(TournamentEvent::ResultsSaved {
            round: record.round,
            points,
        });
        self.publish(TournamentEvent::StandingsUpdated(standings.clone()));

        let export = if record.round == self.config.rounds_total {
            let report = self.export();
            info!("Final round saved; export ready");
            self.publish(TournamentEvent::TournamentCompleted(report.clone()));
            Some(report)
        } else {
            None
        };

        Ok(SaveOutcome {
            record,
            standings,
            export,
        })
    }

    /// Drop the pending round without scoring it
    pub fn discard_round(&mut self) -> TournamentResult<()> {
        if !self.is_pending() {
            return Err(TournamentError::NoPendingRound);
        }
        let round = self.rounds_saved() + 1;
        self.phase = RoundPhase::Idle;
        info!("Round {round} discarded");
        self.publish(TournamentEvent::RoundDiscarded { round });
        Ok(())
    }

    /// Resolve an orphaned round by dropping it
    pub fn recover_by_discarding(&mut self) -> TournamentResult<()> {
        if !self.needs_recovery() {
            return Err(TournamentError::NothingToRecover);
        }
        self.discard_round()
    }

    /// Resolve an orphaned round by reinstating the last published pairings
    pub fn recover_from_snapshot(
        &mut self,
        snapshot: &PairingSnapshot,
    ) -> TournamentResult<&PendingRound> {
        if !self.needs_recovery() {
            return Err(TournamentError::NothingToRecover);
        }
        if snapshot.tables.is_empty() {
            return Err(TournamentError::EmptySnapshot);
        }
        if snapshot.mode != self.mode {
            return Err(TournamentError::SnapshotModeMismatch {
                snapshot: snapshot.mode,
                current: self.mode,
            });
        }

        let round = self.rounds_saved() + 1;
        let mut pending = PendingRound::new(
            round,
            snapshot.title.clone(),
            snapshot.tables.clone(),
            Some("pairings restored".to_string()),
        );
        pending.generated_at = snapshot.generated_at;
        info!("Round {round} restored from pairing snapshot");
        self.phase = RoundPhase::Pending(pending);

        self.pending_round().ok_or(TournamentError::NoPendingRound)
    }

    /// Current standings, recomputed from the whole log
    pub fn standings(&self) -> Vec<Standing> {
        build_standings(&self.rounds, self.roster.names())
    }

    pub fn standings_snapshot(&self) -> StandingsSnapshot {
        StandingsSnapshot {
            title: format!("{} - Standings", self.title),
            generated_at: Utc::now(),
            rows: self.standings(),
        }
    }

    /// Pairings of the pending round, if any
    pub fn pairing_snapshot(&self) -> Option<PairingSnapshot> {
        self.pending_round()
            .map(|pending| pairing_snapshot(self.mode, pending))
    }

    /// Per-round points, in round order
    pub fn round_details(&self) -> Vec<(u32, Vec<RoundPoints>)> {
        self.rounds
            .iter()
            .map(|record| (record.round, round_points(record)))
            .collect()
    }

    /// Report of every saved round plus current standings
    pub fn export(&self) -> ExportReport {
        export::project(&self.rounds, &self.standings())
    }

    /// Clear the round log and any pending round; roster and config are kept
    pub fn clear_rounds(&mut self) {
        self.rounds.clear();
        self.phase = RoundPhase::Idle;
        info!("Round log cleared");
        self.publish(TournamentEvent::Reset);
    }

    /// Clear everything: roster, log, pending round and configuration
    pub fn reset(&mut self) {
        self.roster.clear();
        self.config = TournamentConfig::default();
        self.clear_rounds();
    }

    fn publish(&mut self, event: TournamentEvent) {
        for sink in &mut self.sinks {
            sink.publish(&event);
        }
    }
}

fn pairing_snapshot(mode: Mode, pending: &PendingRound) -> PairingSnapshot {
    PairingSnapshot {
        title: pending.title.clone(),
        mode,
        tables: pending.tables.clone(),
        generated_at: pending.generated_at,
    }
}
