//! JSON state-file participant store.
//!
//! Persists the whole pool as one JSON document:
//! `{ "participants": [...], "config": {...} }`.
//!
//! - Reads tolerate a missing file (empty pool, configured default settings)
//! - Unparsable files are logged and treated as empty; the next write replaces them
//! - Writes go to a sibling temp file and are renamed over the original
//! - Read-modify-write cycles are serialized by a mutex shared between clones
//!   of one store, which makes the conditional claim atomic for callers of
//!   that store. Separately constructed stores on the same path, and other
//!   processes, are not coordinated

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::{EventConfig, NewParticipant, Participant, ParticipantPatch};
use crate::persistent_store::ParticipantStore;
use crate::storage::document::PoolDocument;

/// `ParticipantStore` backed by a local JSON file
#[derive(Debug, Clone)]
pub struct JsonFileParticipantStore {
    path: PathBuf,
    defaults: EventConfig,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileParticipantStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: EventConfig::default(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Settings reported until a document with saved settings exists
    pub fn with_default_config(mut self, config: EventConfig) -> Self {
        self.defaults = config;
        self
    }

    fn empty_document(&self) -> PoolDocument {
        PoolDocument {
            participants: Vec::new(),
            config: self.defaults.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<PoolDocument> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "State file missing, starting empty");
                return Ok(self.empty_document());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state file {}", self.path.display()));
            }
        };

        match serde_json::from_str(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "State file is not valid JSON, treating as empty"
                );
                Ok(self.empty_document())
            }
        }
    }

    async fn save(&self, doc: &PoolDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(doc).context("Failed to serialize state")?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;
        Ok(())
    }

    /// Load, mutate, and save under the write lock
    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PoolDocument) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.save(&doc).await?;
        Ok(out)
    }
}

#[async_trait]
impl ParticipantStore for JsonFileParticipantStore {
    async fn fetch_all_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.load().await?.participants)
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        self.mutate(|doc| Ok(doc.insert(participant))).await
    }

    async fn update_participant(&self, id: &str, patch: ParticipantPatch) -> Result<Participant> {
        self.mutate(|doc| doc.update(id, &patch)).await
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        self.mutate(|doc| doc.delete(id)).await
    }

    async fn fetch_event_config(&self) -> Result<EventConfig> {
        Ok(self.load().await?.config)
    }

    async fn update_event_config(&self, config: EventConfig) -> Result<()> {
        self.mutate(|doc| {
            doc.config = config;
            Ok(())
        })
        .await
    }

    async fn claim_participant(&self, id: &str) -> Result<usize> {
        self.mutate(|doc| Ok(doc.claim(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileParticipantStore {
        JsonFileParticipantStore::new(dir.path().join("nested").join("state.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_pool() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.fetch_all_participants().await.unwrap().is_empty());
        assert_eq!(store.fetch_event_config().await.unwrap(), EventConfig::default());
    }

    #[tokio::test]
    async fn test_missing_file_reports_configured_defaults() {
        let dir = TempDir::new().unwrap();
        let config = EventConfig::new(3, "Workshop").unwrap();
        let store = store_in(&dir).with_default_config(config.clone());
        assert_eq!(store.fetch_event_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let p = store
            .insert_participant(NewParticipant::new("Frosty", "Magic Hat", "4821").unwrap())
            .await
            .unwrap();
        assert_eq!(store.claim_participant(&p.id).await.unwrap(), 1);
        store
            .update_event_config(EventConfig::new(2, "Cocoa night").unwrap())
            .await
            .unwrap();

        let reopened = store_in(&dir);
        let all = reopened.fetch_all_participants().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_claimed);
        assert!(all[0].pin.matches("4821"));
        assert_eq!(reopened.fetch_event_config().await.unwrap().target_count, 2);
        assert_eq!(reopened.claim_participant(&p.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_empty_and_replaced() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), "{not json").await.unwrap();

        assert!(store.fetch_all_participants().await.unwrap().is_empty());

        store
            .insert_participant(NewParticipant::new("Buddy", "Syrup", "1234").unwrap())
            .await
            .unwrap();
        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let doc: PoolDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_participant_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store
            .update_participant("ghost", ParticipantPatch::claimed(true))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_clones_share_the_claim_lock() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let p = store
            .insert_participant(NewParticipant::new("Buddy", "Syrup", "1111").unwrap())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = p.id.clone();
            handles.push(tokio::spawn(async move { store.claim_participant(&id).await.unwrap() }));
        }
        let mut wins = 0;
        for handle in handles {
            wins += handle.await.unwrap();
        }
        assert_eq!(wins, 1);
    }
}
