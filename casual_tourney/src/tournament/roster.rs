//! Participant roster.

use log::debug;
use serde::{Deserialize, Serialize};

use super::errors::{TournamentError, TournamentResult};

/// Ordered list of display names, unique ignoring case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored or user-supplied names
    ///
    /// Names are trimmed; blanks and case-insensitive repeats are dropped, keeping
    /// the first spelling seen.
    pub fn from_untrusted<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            if let Err(e) = roster.add(name.as_ref()) {
                debug!("Skipping roster entry {:?}: {e}", name.as_ref());
            }
        }
        roster
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered spelling of `name`, matched ignoring case
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.names
            .iter()
            .find(|n| n.to_lowercase() == wanted)
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Register a participant, returning the stored (trimmed) name
    pub fn add(&mut self, name: &str) -> TournamentResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyParticipantName);
        }
        if let Some(existing) = self.find(name) {
            return Err(TournamentError::DuplicateParticipant(existing.to_string()));
        }
        self.names.push(name.to_string());
        Ok(name.to_string())
    }

    /// Remove a participant, returning the registered spelling
    pub fn remove(&mut self, name: &str) -> TournamentResult<String> {
        let wanted = name.trim().to_lowercase();
        let index = self
            .names
            .iter()
            .position(|n| n.to_lowercase() == wanted)
            .ok_or_else(|| TournamentError::UnknownParticipant(name.trim().to_string()))?;
        Ok(self.names.remove(index))
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_duplicates() {
        let mut roster = Roster::new();
        assert_eq!(roster.add("  Ana ").unwrap(), "Ana");
        assert!(matches!(
            roster.add("ANA"),
            Err(TournamentError::DuplicateParticipant(name)) if name == "Ana"
        ));
        assert!(matches!(
            roster.add("   "),
            Err(TournamentError::EmptyParticipantName)
        ));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_from_untrusted_dedupes() {
        let roster = Roster::from_untrusted(["Ana", "bruno", "", "ana", "Bruno ", "Carla"]);
        assert_eq!(roster.names(), ["Ana", "bruno", "Carla"]);
    }

    #[test]
    fn test_remove_ignores_case() {
        let mut roster = Roster::from_untrusted(["Ana", "Bruno"]);
        assert_eq!(roster.remove("bruno").unwrap(), "Bruno");
        assert!(!roster.contains("Bruno"));
        assert!(matches!(
            roster.remove("Zoe"),
            Err(TournamentError::UnknownParticipant(_))
        ));
    }

    #[test]
    fn test_find_returns_registered_spelling() {
        let roster = Roster::from_untrusted(["Ana María"]);
        assert_eq!(roster.find("ana maría"), Some("Ana María"));
        assert_eq!(roster.find("Zoe"), None);
    }
}
