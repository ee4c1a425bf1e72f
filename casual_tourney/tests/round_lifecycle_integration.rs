//! Integration tests for the round lifecycle
//!
//! These tests drive a tournament through generation, placement entry, saving,
//! discarding and recovery the way a host would.

use casual_tourney::{
    Mode, SeatShuffler, TournamentConfig, TournamentError, TournamentEvent, TournamentManager,
    pairing::RoundSeeder,
    tournament::{RoundPhase, StoredTournament, events::ChannelSink},
};
use std::sync::mpsc;

fn tournament(mode: Mode, players: &[&str], rounds: u32, seed: u64) -> TournamentManager {
    let mut manager = TournamentManager::new("League Night", mode, TournamentConfig::new(rounds))
        .unwrap()
        .with_seeder(RoundSeeder::new(SeatShuffler::with_seed(seed)));
    for name in players {
        manager.add_participant(name).unwrap();
    }
    manager
}

/// Rank every table in seating order
fn place_all(manager: &mut TournamentManager) {
    let sizes: Vec<usize> = manager
        .pending_round()
        .unwrap()
        .tables
        .iter()
        .map(|t| t.len().min(4))
        .collect();
    for (table, slots) in sizes.into_iter().enumerate() {
        for rank in 0..slots {
            manager.select_placement(table, rank, rank).unwrap();
        }
    }
}

#[test]
fn test_generate_twice_keeps_first_tables() {
    let mut manager = tournament(Mode::FreeForAll, &["A", "B", "C", "D", "E", "F", "G"], 3, 1);
    let first = manager.generate_round().unwrap().tables.clone();

    let err = manager.generate_round().unwrap_err();
    assert!(matches!(err, TournamentError::RoundAlreadyPending));
    assert_eq!(manager.pending_round().unwrap().tables, first);
}

#[test]
fn test_full_tournament_runs_to_completion() {
    let players = ["Ana", "Bruno", "Carla", "Dani", "Eva", "Fede"];
    let mut manager = tournament(Mode::FreeForAll, &players, 3, 42);

    for round in 1..=3 {
        let pending = manager.generate_round().unwrap();
        assert_eq!(pending.round, round);
        assert_eq!(pending.title, format!("League Night - Round {round}"));

        place_all(&mut manager);
        let outcome = manager.save_results().unwrap();
        assert_eq!(outcome.record.round, round);
        assert_eq!(outcome.export.is_some(), round == 3);
        assert_eq!(outcome.standings.title, "League Night - Standings");
    }

    assert!(manager.is_complete());
    assert!(matches!(
        manager.generate_round(),
        Err(TournamentError::RoundsExhausted { total: 3 })
    ));

    // 6 players -> two tables of 3 -> 18 points a round
    let total: u32 = manager.standings().iter().map(|s| s.points).sum();
    assert_eq!(total, 54);
    assert!(manager.standings().iter().all(|s| s.rounds_played == 3));
}

#[test]
fn test_later_rounds_seat_leaders_together() {
    let players = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let mut manager = tournament(Mode::FreeForAll, &players, 2, 7);
    manager.generate_round().unwrap();
    place_all(&mut manager);
    manager.save_results().unwrap();

    let leaders: Vec<String> = manager
        .standings()
        .iter()
        .take(4)
        .map(|s| s.name.clone())
        .collect();
    let pending = manager.generate_round().unwrap();
    let first_table: Vec<String> = pending.tables[0].players().map(str::to_string).collect();
    assert_eq!(first_table, leaders);
}

#[test]
fn test_failed_save_keeps_round_pending() {
    let mut manager = tournament(Mode::OneVsOne, &["A", "B", "C", "D"], 2, 3);
    manager.generate_round().unwrap();

    assert!(matches!(
        manager.save_results(),
        Err(TournamentError::NoPlacementsSelected)
    ));
    assert!(matches!(manager.phase(), RoundPhase::Pending(_)));

    manager.select_placement(0, 0, 1).unwrap();
    let pending = manager.pending_round().unwrap();
    assert_eq!(pending.placements[0].ranks(), &[Some(1), Some(0)]);

    // Only one table ranked; the other scores nothing
    let outcome = manager.save_results().unwrap();
    assert_eq!(outcome.record.rows.len(), 2);
}

#[test]
fn test_clearing_a_rank_before_save() {
    let mut manager = tournament(Mode::FreeForAll, &["A", "B", "C"], 1, 9);
    manager.generate_round().unwrap();
    manager.select_placement(0, 0, 0).unwrap();
    manager.clear_placement(0, 0).unwrap();

    assert!(matches!(
        manager.save_results(),
        Err(TournamentError::NoPlacementsSelected)
    ));
    assert!(matches!(
        manager.clear_placement(4, 0),
        Err(TournamentError::InvalidTableIndex(4))
    ));
}

#[test]
fn test_discard_then_regenerate() {
    let mut manager = tournament(Mode::TwoPlayerTeam, &["A", "B", "C", "D"], 2, 5);
    manager.generate_round().unwrap();
    manager.discard_round().unwrap();
    assert!(manager.rounds().is_empty());

    let pending = manager.generate_round().unwrap();
    assert_eq!(pending.round, 1);
}

#[test]
fn test_stored_round_trip_keeps_pending_tables() {
    let mut manager = tournament(Mode::OneVsOne, &["A", "B", "C"], 2, 8);
    manager.generate_round().unwrap();
    manager.select_placement(0, 0, 0).unwrap();

    let json = serde_json::to_string(&manager.to_stored()).unwrap();
    let stored: StoredTournament = serde_json::from_str(&json).unwrap();
    let mut restored = TournamentManager::from_stored(stored, Mode::FreeForAll).unwrap();

    assert_eq!(restored.mode(), Mode::OneVsOne);
    assert_eq!(restored.pending_round(), manager.pending_round());
    restored.save_results().unwrap();
    assert_eq!(restored.rounds().len(), 1);
}

#[test]
fn test_lost_tables_require_recovery() {
    let mut manager = tournament(Mode::OneVsOne, &["A", "B"], 2, 8);
    manager.generate_round().unwrap();

    let mut stored = manager.to_stored();
    stored.pending_round = None;
    let mut restored = TournamentManager::from_stored(stored, Mode::OneVsOne).unwrap();
    assert!(restored.needs_recovery());
    assert!(matches!(
        restored.select_placement(0, 0, 0),
        Err(TournamentError::NoPendingRound)
    ));

    restored.recover_by_discarding().unwrap();
    assert_eq!(restored.phase(), &RoundPhase::Idle);
    assert!(restored.generate_round().is_ok());
}

#[test]
fn test_channel_receives_round_events() {
    let (tx, rx) = mpsc::channel();
    let mut manager = tournament(Mode::OneVsOne, &["A", "B"], 2, 4);
    manager.subscribe(ChannelSink(tx));

    manager.generate_round().unwrap();
    manager.discard_round().unwrap();

    let events: Vec<TournamentEvent> = rx.try_iter().collect();
    assert_eq!(events.len(), 2);
    match &events[0] {
        TournamentEvent::RoundSeeded(snapshot) => {
            assert_eq!(snapshot.title, "League Night - Round 1");
            assert_eq!(snapshot.mode, Mode::OneVsOne);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[1], TournamentEvent::RoundDiscarded { round: 1 });
}

#[test]
fn test_clear_rounds_keeps_roster() {
    let mut manager = tournament(Mode::OneVsOne, &["A", "B"], 1, 2);
    manager.generate_round().unwrap();
    manager.select_placement(0, 0, 0).unwrap();
    manager.save_results().unwrap();

    manager.clear_rounds();
    assert!(manager.rounds().is_empty());
    assert_eq!(manager.participants().len(), 2);
    assert!(manager.generate_round().is_ok());
}
