//! JSON file stores.
//!
//! Each store lives in its own file under the data directory, the way the
//! tournament's host-side state is split: roster, configuration, round log, pending
//! flag, pending tables, and the published pairing and standings snapshots.

use anyhow::{Context, Result};
use casual_tourney::{
    ManualPairing, Mode, PairingSnapshot, RoundRecord, StandingsSnapshot, TournamentConfig,
    TournamentManager,
    tournament::{PendingRound, StoredTournament},
};
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::HostConfig;

const PARTICIPANTS_FILE: &str = "participants.json";
const SETTINGS_FILE: &str = "settings.json";
const ROUNDS_FILE: &str = "rounds.json";
const PENDING_FLAG_FILE: &str = "pending.json";
const PENDING_TABLES_FILE: &str = "tables.json";
const PAIRINGS_FILE: &str = "pairings.json";
const STANDINGS_FILE: &str = "standings.json";
const MANUAL_FILE: &str = "manual.json";

/// Tournament-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    title: String,
    mode: Mode,
    config: TournamentConfig,
}

/// Directory of JSON stores
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open the store, creating its directory if needed
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Rebuild the tournament from every store, falling back to `defaults`
    pub fn load(&self, defaults: &HostConfig) -> Result<TournamentManager> {
        let settings = self
            .read::<Settings>(SETTINGS_FILE)?
            .unwrap_or_else(|| Settings {
                title: defaults.title.clone(),
                mode: defaults.mode,
                config: TournamentConfig::new(defaults.rounds_total),
            });

        let stored = StoredTournament {
            title: settings.title,
            mode: Some(settings.mode),
            config: settings.config,
            participants: self.read(PARTICIPANTS_FILE)?.unwrap_or_default(),
            rounds: self.read::<Vec<RoundRecord>>(ROUNDS_FILE)?.unwrap_or_default(),
            pending: self.read(PENDING_FLAG_FILE)?.unwrap_or(false),
            pending_round: self.read::<PendingRound>(PENDING_TABLES_FILE)?,
        };
        debug!(
            "Loaded {} participant(s) and {} round(s) from {}",
            stored.participants.len(),
            stored.rounds.len(),
            self.dir.display()
        );

        Ok(TournamentManager::from_stored(stored, defaults.mode)?)
    }

    /// Persist every store
    ///
    /// The round log is written first and the pending flag before the pending
    /// tables. An interrupted save then reloads either as a pending round that is
    /// already in the log, which is dropped, or as a pending round without tables.
    pub fn save(&self, manager: &TournamentManager) -> Result<()> {
        let stored = manager.to_stored();
        self.write(
            SETTINGS_FILE,
            &Settings {
                title: stored.title,
                mode: manager.mode(),
                config: stored.config,
            },
        )?;
        self.write(PARTICIPANTS_FILE, &stored.participants)?;
        self.write(ROUNDS_FILE, &stored.rounds)?;
        self.write(PENDING_FLAG_FILE, &stored.pending)?;
        match &stored.pending_round {
            Some(pending) => self.write(PENDING_TABLES_FILE, pending),
            None => self.remove(PENDING_TABLES_FILE),
        }
    }

    pub fn pairings(&self) -> Result<Option<PairingSnapshot>> {
        self.read(PAIRINGS_FILE)
    }

    pub fn publish_pairings(&self, snapshot: &PairingSnapshot) -> Result<()> {
        self.write(PAIRINGS_FILE, snapshot)
    }

    pub fn standings(&self) -> Result<Option<StandingsSnapshot>> {
        self.read(STANDINGS_FILE)
    }

    pub fn publish_standings(&self, snapshot: &StandingsSnapshot) -> Result<()> {
        self.write(STANDINGS_FILE, snapshot)
    }

    pub fn clear_pairings(&self) -> Result<()> {
        self.remove(PAIRINGS_FILE)
    }

    /// Remove both published snapshots
    pub fn clear_snapshots(&self) -> Result<()> {
        self.clear_pairings()?;
        self.remove(STANDINGS_FILE)
    }

    pub fn manual(&self) -> Result<Option<ManualPairing>> {
        self.read(MANUAL_FILE)
    }

    pub fn save_manual(&self, manual: &ManualPairing) -> Result<()> {
        self.write(MANUAL_FILE, manual)
    }

    pub fn clear_manual(&self) -> Result<()> {
        self.remove(MANUAL_FILE)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt store {}", path.display()))?;
        Ok(Some(value))
    }

    /// Write through a temporary file so readers never see a partial store
    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, raw).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}
