//! In-memory participant store.
//!
//! Thread-safe via `RwLock`; the conditional claim runs under a single write
//! lock, so concurrent commits in one process can never double-claim.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{EventConfig, NewParticipant, Participant, ParticipantPatch};
use crate::persistent_store::ParticipantStore;
use crate::storage::document::PoolDocument;

/// `ParticipantStore` kept entirely in process memory
#[derive(Clone, Default)]
pub struct InMemoryParticipantStore {
    doc: Arc<RwLock<PoolDocument>>,
}

impl InMemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given event settings
    pub fn with_config(config: EventConfig) -> Self {
        Self {
            doc: Arc::new(RwLock::new(PoolDocument {
                participants: Vec::new(),
                config,
            })),
        }
    }

    /// Seed participants directly, bypassing id issuance (test fixtures)
    pub async fn seed(&self, participants: Vec<Participant>) {
        self.doc.write().await.participants.extend(participants);
    }
}

impl std::fmt::Debug for InMemoryParticipantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryParticipantStore")
            .field("doc", &"<RwLock<PoolDocument>>")
            .finish()
    }
}

#[async_trait]
impl ParticipantStore for InMemoryParticipantStore {
    async fn fetch_all_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.doc.read().await.participants.clone())
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        Ok(self.doc.write().await.insert(participant))
    }

    async fn update_participant(&self, id: &str, patch: ParticipantPatch) -> Result<Participant> {
        self.doc.write().await.update(id, &patch)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        self.doc.write().await.delete(id)
    }

    async fn fetch_event_config(&self) -> Result<EventConfig> {
        Ok(self.doc.read().await.config.clone())
    }

    async fn update_event_config(&self, config: EventConfig) -> Result<()> {
        self.doc.write().await.config = config;
        Ok(())
    }

    async fn claim_participant(&self, id: &str) -> Result<usize> {
        Ok(self.doc.write().await.claim(id))
    }
}
