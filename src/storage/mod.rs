//! Storage Module
//!
//! Concrete `ParticipantStore` adapters and the factory that picks one from
//! configuration.

pub mod document;
pub mod http;
pub mod json_file;
pub mod memory;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::EventConfig;
use crate::persistent_store::ParticipantStore;

pub use document::PoolDocument;
pub use http::HttpParticipantStore;
pub use json_file::JsonFileParticipantStore;
pub use memory::InMemoryParticipantStore;

/// Build the store selected by `config`.
///
/// `event` seeds the in-memory store and is what the file-backed settings
/// (json_file, http) report until settings are saved. The http backend keeps
/// its settings in `state_file`.
pub fn build_store(config: &StorageConfig, event: EventConfig) -> Result<Arc<dyn ParticipantStore>> {
    let store: Arc<dyn ParticipantStore> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryParticipantStore::with_config(event)),
        StorageBackend::JsonFile => Arc::new(
            JsonFileParticipantStore::new(&config.state_file).with_default_config(event),
        ),
        StorageBackend::Http => {
            let url = config
                .api_url
                .as_deref()
                .context("storage.api_url is required for the http backend")?;
            let settings = JsonFileParticipantStore::new(&config.state_file).with_default_config(event);
            Arc::new(HttpParticipantStore::new(url, config.http_timeout(), settings)?)
        }
    };

    info!(backend = %config.backend, "Participant store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_store_uses_event_defaults() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let event = EventConfig::new(2, "tiny party").unwrap();
        let store = build_store(&config, event.clone()).unwrap();
        assert_eq!(store.fetch_event_config().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_http_store_settings_persist_across_builds() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Http,
            state_file: dir.path().join("gacha-state.json"),
            api_url: Some("https://example.invalid/participants".to_string()),
            ..StorageConfig::default()
        };

        let first = build_store(&config, EventConfig::default()).unwrap();
        first
            .update_event_config(EventConfig::new(3, "Office party").unwrap())
            .await
            .unwrap();

        let second = build_store(&config, EventConfig::default()).unwrap();
        assert_eq!(second.fetch_event_config().await.unwrap().target_count, 3);
    }

    #[test]
    fn test_build_http_store_without_url_fails() {
        let config = StorageConfig {
            backend: StorageBackend::Http,
            ..StorageConfig::default()
        };
        assert!(build_store(&config, EventConfig::default()).is_err());
    }
}
