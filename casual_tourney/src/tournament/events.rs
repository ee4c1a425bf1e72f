//! Notifications published to the host.
//!
//! The engine does not know how snapshots reach a second screen or a file; it hands
//! each event to every registered [`EventSink`].

use log::warn;
use std::{fmt, sync::mpsc::Sender};

use super::models::{PairingSnapshot, StandingsSnapshot};
use crate::export::ExportReport;

/// Something the host may want to display or persist
#[derive(Debug, Clone, PartialEq)]
pub enum TournamentEvent {
    /// New tables are awaiting results
    RoundSeeded(PairingSnapshot),
    /// A pending round was dropped without scoring
    RoundDiscarded { round: u32 },
    /// A round was appended to the log
    ResultsSaved { round: u32, points: u32 },
    StandingsUpdated(StandingsSnapshot),
    /// The final configured round was saved
    TournamentCompleted(ExportReport),
    /// Round log cleared
    Reset,
}

impl fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundSeeded(snapshot) => write!(
                f,
                "{}: {} table(s) seeded",
                snapshot.title,
                snapshot.tables.len()
            ),
            Self::RoundDiscarded { round } => write!(f, "round {round} discarded"),
            Self::ResultsSaved { round, points } => {
                write!(f, "round {round} saved ({points} points awarded)")
            }
            Self::StandingsUpdated(snapshot) => write!(
                f,
                "{}: {} row(s)",
                snapshot.title,
                snapshot.rows.len()
            ),
            Self::TournamentCompleted(report) => write!(
                f,
                "tournament complete ({} result row(s))",
                report.detail.len()
            ),
            Self::Reset => write!(f, "round log cleared"),
        }
    }
}

/// Receiver of tournament events
pub trait EventSink {
    fn publish(&mut self, event: &TournamentEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&TournamentEvent),
{
    fn publish(&mut self, event: &TournamentEvent) {
        (self)(event);
    }
}

/// Forwards events over a channel
#[derive(Debug, Clone)]
pub struct ChannelSink(pub Sender<TournamentEvent>);

impl EventSink for ChannelSink {
    fn publish(&mut self, event: &TournamentEvent) {
        if self.0.send(event.clone()).is_err() {
            warn!("Event receiver dropped; discarding: {event}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: &TournamentEvent| seen.push(e.to_string());
            sink.publish(&TournamentEvent::RoundDiscarded { round: 2 });
        }
        assert_eq!(seen, vec!["round 2 discarded"]);
    }

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink(tx);
        sink.publish(&TournamentEvent::Reset);
        assert_eq!(rx.recv().unwrap(), TournamentEvent::Reset);

        drop(rx);
        // Publishing after the receiver is gone only logs
        sink.publish(&TournamentEvent::Reset);
    }
}
