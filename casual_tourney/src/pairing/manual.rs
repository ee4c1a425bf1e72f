//! Hand-built 1-vs-1 pairings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::tournament::{Entry, Table, TournamentError, TournamentResult};

/// Incremental builder for an operator-chosen 1-vs-1 round
///
/// Matches are added two players at a time, or one player with an explicit bye.
/// The result is only accepted once every participant sits at exactly one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPairing {
    participants: Vec<String>,
    tables: Vec<Table>,
}

impl ManualPairing {
    pub fn new(participants: &[String]) -> Self {
        Self {
            participants: participants.to_vec(),
            tables: Vec::new(),
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn is_placed(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.players().any(|p| p == name))
    }

    /// Participants not yet at a table, in roster order
    pub fn unplaced(&self) -> Vec<String> {
        self.participants
            .iter()
            .filter(|p| !self.is_placed(p))
            .cloned()
            .collect()
    }

    /// Seat two unplaced participants against each other
    pub fn pair(&mut self, first: &str, second: &str) -> TournamentResult<()> {
        let first = self.claim(first)?;
        let second = self.claim(second)?;
        if first == second {
            return Err(TournamentError::ParticipantAlreadyPlaced(first));
        }
        self.tables
            .push(Table::new(vec![Entry::player(first), Entry::player(second)]));
        Ok(())
    }

    /// Give an unplaced participant a bye
    pub fn bye(&mut self, name: &str) -> TournamentResult<()> {
        let name = self.claim(name)?;
        self.tables.push(Table::new(vec![Entry::bye(name)]));
        Ok(())
    }

    /// Remove the most recently added table
    pub fn undo(&mut self) -> Option<Table> {
        self.tables.pop()
    }

    /// Accept the built tables once coverage is complete
    pub fn confirm(self) -> TournamentResult<Vec<Table>> {
        validate_coverage(&self.participants, &self.tables)?;
        Ok(self.tables)
    }

    /// Registered spelling of `name`, provided it is still unplaced
    fn claim(&self, name: &str) -> TournamentResult<String> {
        let wanted = name.trim().to_lowercase();
        let canonical = self
            .participants
            .iter()
            .find(|p| p.to_lowercase() == wanted)
            .ok_or_else(|| TournamentError::UnknownParticipant(name.trim().to_string()))?;
        if self.is_placed(canonical) {
            return Err(TournamentError::ParticipantAlreadyPlaced(canonical.clone()));
        }
        Ok(canonical.clone())
    }
}

/// Every participant seated exactly once, nobody else seated
pub fn validate_coverage(participants: &[String], tables: &[Table]) -> TournamentResult<()> {
    let mut seen = HashSet::new();
    for player in tables.iter().flat_map(Table::players) {
        if !participants.iter().any(|p| p == player) {
            return Err(TournamentError::UnknownParticipant(player.to_string()));
        }
        if !seen.insert(player) {
            return Err(TournamentError::ParticipantAlreadyPlaced(player.to_string()));
        }
    }

    let unplaced: Vec<String> = participants
        .iter()
        .filter(|p| !seen.contains(p.as_str()))
        .cloned()
        .collect();
    if !unplaced.is_empty() {
        return Err(TournamentError::IncompleteManualSeeding { unplaced });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<String> {
        ["Ana", "Bruno", "Carla"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete_pairing_confirms() {
        let mut manual = ManualPairing::new(&roster());
        manual.pair("ana", "Carla").unwrap();
        manual.bye("BRUNO").unwrap();

        let tables = manual.confirm().unwrap();
        assert_eq!(tables[0].labels(), vec!["Ana", "Carla"]);
        assert_eq!(tables[1].labels(), vec!["Bruno (bye)"]);
    }

    #[test]
    fn test_incomplete_pairing_rejected() {
        let mut manual = ManualPairing::new(&roster());
        manual.pair("Ana", "Bruno").unwrap();
        assert_eq!(manual.unplaced(), vec!["Carla".to_string()]);

        match manual.confirm() {
            Err(TournamentError::IncompleteManualSeeding { unplaced }) => {
                assert_eq!(unplaced, vec!["Carla".to_string()]);
            }
            other => panic!("expected incomplete seeding, got {other:?}"),
        }
    }

    #[test]
    fn test_cannot_place_twice() {
        let mut manual = ManualPairing::new(&roster());
        manual.pair("Ana", "Bruno").unwrap();
        assert!(matches!(
            manual.bye("Ana"),
            Err(TournamentError::ParticipantAlreadyPlaced(name)) if name == "Ana"
        ));
        assert!(matches!(
            manual.pair("Carla", "Carla"),
            Err(TournamentError::ParticipantAlreadyPlaced(_))
        ));
        assert_eq!(manual.tables().len(), 1);
    }

    #[test]
    fn test_unknown_participant() {
        let mut manual = ManualPairing::new(&roster());
        assert!(matches!(
            manual.pair("Ana", "Zoe"),
            Err(TournamentError::UnknownParticipant(name)) if name == "Zoe"
        ));
        assert!(manual.tables().is_empty());
    }

    #[test]
    fn test_undo_frees_players() {
        let mut manual = ManualPairing::new(&roster());
        manual.pair("Ana", "Bruno").unwrap();
        assert!(manual.undo().is_some());
        assert!(!manual.is_placed("Ana"));
        assert_eq!(manual.unplaced().len(), 3);
    }

    #[test]
    fn test_coverage_rejects_duplicates_and_strangers() {
        let participants = roster();
        let duplicate = vec![
            Table::of_players(&["Ana", "Bruno"]),
            Table::of_players(&["Carla", "Ana"]),
        ];
        assert!(matches!(
            validate_coverage(&participants, &duplicate),
            Err(TournamentError::ParticipantAlreadyPlaced(_))
        ));

        let stranger = vec![
            Table::of_players(&["Ana", "Bruno"]),
            Table::of_players(&["Carla", "Zoe"]),
        ];
        assert!(matches!(
            validate_coverage(&participants, &stranger),
            Err(TournamentError::UnknownParticipant(_))
        ));
    }
}
