//! Forwards tournament events to the snapshot stores and writes export files.

use anyhow::{Context, Result};
use casual_tourney::{ExportReport, TournamentEvent, export_file_name, tournament::EventSink};
use log::{error, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::store::Store;

/// Event sink that keeps the published snapshots current
///
/// Pairings are shown from seeding until the round is saved or discarded;
/// standings are replaced after every save.
pub struct SnapshotPublisher {
    store: Store,
}

impl SnapshotPublisher {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn handle(&self, event: &TournamentEvent) -> Result<()> {
        match event {
            TournamentEvent::RoundSeeded(snapshot) => self.store.publish_pairings(snapshot),
            TournamentEvent::ResultsSaved { .. } | TournamentEvent::RoundDiscarded { .. } => {
                self.store.clear_pairings()
            }
            TournamentEvent::StandingsUpdated(snapshot) => self.store.publish_standings(snapshot),
            TournamentEvent::Reset => self.store.clear_snapshots(),
            TournamentEvent::TournamentCompleted(_) => Ok(()),
        }
    }
}

impl EventSink for SnapshotPublisher {
    fn publish(&mut self, event: &TournamentEvent) {
        info!("{event}");
        if let Err(e) = self.handle(event) {
            error!("Failed to publish {event}: {e:#}");
        }
    }
}

/// Write `report` as CSV into `dir`, named after the tournament title
pub fn write_export(report: &ExportReport, dir: &Path, title: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(title));
    write_export_to(report, &path)?;
    Ok(path)
}

/// Write `report` as CSV to `path`
pub fn write_export_to(report: &ExportReport, path: &Path) -> Result<()> {
    let csv = report.to_csv()?;
    fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))
}
