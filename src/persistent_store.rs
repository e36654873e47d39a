//! Persistent Store Abstraction
//!
//! This module defines the `ParticipantStore` trait that abstracts persistence
//! of participants and event settings. The ledger holds it as
//! `Arc<dyn ParticipantStore>`, so the same draw rules run against the
//! in-memory store in tests, a local JSON state file, or a remote REST
//! collection.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{EventConfig, NewParticipant, Participant, ParticipantPatch};

/// Persistent storage abstraction for participants and event settings
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// Load every participant, in registration order
    async fn fetch_all_participants(&self) -> Result<Vec<Participant>>;

    /// Store a new participant and return it with its issued id
    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant>;

    /// Apply a partial update and return the updated record
    ///
    /// Fails when no participant has the given id.
    async fn update_participant(&self, id: &str, patch: ParticipantPatch) -> Result<Participant>;

    /// Remove a participant
    ///
    /// Fails when no participant has the given id.
    async fn delete_participant(&self, id: &str) -> Result<()>;

    async fn fetch_event_config(&self) -> Result<EventConfig>;

    async fn update_event_config(&self, config: EventConfig) -> Result<()>;

    /// Conditionally claim a participant
    ///
    /// Sets `is_claimed = true` only if the participant exists and is still
    /// unclaimed. Returns the number of records changed: `1` when this call
    /// won the claim, `0` when the participant was already claimed or gone.
    ///
    /// The default implementation is read-then-write and only as atomic as
    /// the caller's own serialization; stores that can do better override it.
    async fn claim_participant(&self, id: &str) -> Result<usize> {
        let still_unclaimed = self
            .fetch_all_participants()
            .await?
            .iter()
            .any(|p| p.id == id && !p.is_claimed);
        if !still_unclaimed {
            return Ok(0);
        }
        self.update_participant(id, ParticipantPatch::claimed(true)).await?;
        Ok(1)
    }
}
