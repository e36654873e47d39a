//! Pool document shared by the local store adapters.
//!
//! The in-memory and JSON-file stores keep the same shape: an ordered list
//! of participants plus the event settings. All record-level rules for those
//! adapters live here so both behave identically.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EventConfig, NewParticipant, Participant, ParticipantPatch};

/// Complete local store contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDocument {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub config: EventConfig,
}

impl PoolDocument {
    pub fn insert(&mut self, new: NewParticipant) -> Participant {
        let participant = new.into_participant(Uuid::new_v4().to_string());
        self.participants.push(participant.clone());
        participant
    }

    pub fn update(&mut self, id: &str, patch: &ParticipantPatch) -> Result<Participant> {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => {
                participant.apply(patch);
                Ok(participant.clone())
            }
            None => bail!("Participant not found: {}", id),
        }
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            bail!("Participant not found: {}", id);
        }
        Ok(())
    }

    /// Claim only if present and unclaimed; returns rows changed
    pub fn claim(&mut self, id: &str) -> usize {
        match self.participants.iter_mut().find(|p| p.id == id && !p.is_claimed) {
            Some(participant) => {
                participant.is_claimed = true;
                1
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(name: &str) -> NewParticipant {
        NewParticipant::new(name, "socks", "1234").unwrap()
    }

    #[test]
    fn test_insert_issues_unique_ids_in_order() {
        let mut doc = PoolDocument::default();
        let a = doc.insert(new("a"));
        let b = doc.insert(new("b"));
        assert_ne!(a.id, b.id);
        let names: Vec<_> = doc.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_update_and_delete_missing_fail() {
        let mut doc = PoolDocument::default();
        assert!(doc.update("nope", &ParticipantPatch::claimed(true)).is_err());
        assert!(doc.delete("nope").is_err());
    }

    #[test]
    fn test_claim_is_conditional() {
        let mut doc = PoolDocument::default();
        let a = doc.insert(new("a"));
        assert_eq!(doc.claim(&a.id), 1);
        assert_eq!(doc.claim(&a.id), 0);
        assert_eq!(doc.claim("missing"), 0);
        assert!(doc.participants[0].is_claimed);
    }

    #[test]
    fn test_missing_sections_default() {
        let doc: PoolDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.participants.is_empty());
        assert_eq!(doc.config, EventConfig::default());
    }
}
