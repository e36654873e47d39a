//! JSON-over-HTTP participant store.
//!
//! Talks to a plain REST collection (MockAPI style):
//!
//! | operation | request             |
//! |-----------|---------------------|
//! | fetch all | `GET    {base}`      |
//! | insert    | `POST   {base}`      |
//! | update    | `PUT    {base}/{id}` |
//! | delete    | `DELETE {base}/{id}` |
//!
//! Records are camelCase JSON. Some hosted collections store booleans as
//! strings, so `isClaimed` accepts both `true` and `"true"`.
//!
//! Event settings are not part of the collection. They are kept in the
//! `config` section of a local JSON state file, so they survive restarts.
//!
//! The conditional claim is read-then-write over two requests. Two clients
//! committing at the same moment can still both claim the same recipient;
//! this adapter does not close that race.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::domain::{EventConfig, NewParticipant, Participant, ParticipantPatch, Pin};
use crate::persistent_store::ParticipantStore;
use crate::storage::json_file::JsonFileParticipantStore;

/// `ParticipantStore` backed by a remote REST collection
#[derive(Debug)]
pub struct HttpParticipantStore {
    client: reqwest::Client,
    base_url: String,
    /// Local file holding event settings; its participant list stays empty
    settings: JsonFileParticipantStore,
}

impl HttpParticipantStore {
    /// Create a store for the collection at `base_url`, keeping event
    /// settings in `settings`
    pub fn new(base_url: &str, timeout: Duration, settings: JsonFileParticipantStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Record as it appears on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireParticipant {
    id: String,
    name: String,
    #[serde(default)]
    wishlist: String,
    #[serde(default)]
    pin: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    is_claimed: bool,
    #[serde(default)]
    drawn_match_id: Option<String>,
}

/// Body sent on insert
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireNewParticipant<'a> {
    name: &'a str,
    wishlist: &'a str,
    pin: &'a str,
    is_claimed: bool,
    drawn_match_id: Option<&'a str>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

impl TryFrom<WireParticipant> for Participant {
    type Error = anyhow::Error;

    fn try_from(wire: WireParticipant) -> Result<Self> {
        let pin = wire
            .pin
            .as_deref()
            .with_context(|| format!("Participant {} has no PIN on record", wire.id))
            .and_then(|raw| {
                Pin::parse(raw)
                    .with_context(|| format!("Participant {} has an invalid PIN on record", wire.id))
            })?;

        Ok(Participant {
            id: wire.id,
            name: wire.name,
            wishlist: wire.wishlist,
            pin,
            is_claimed: wire.is_claimed,
            drawn_match_id: wire.drawn_match_id.filter(|id| !id.is_empty()),
        })
    }
}

/// Decode a collection listing into participants
fn decode_listing(body: &str) -> Result<Vec<Participant>> {
    let records: Vec<WireParticipant> =
        serde_json::from_str(body).context("Failed to decode participant listing")?;
    records.into_iter().map(Participant::try_from).collect()
}

fn decode_record(body: &str) -> Result<Participant> {
    let record: WireParticipant =
        serde_json::from_str(body).context("Failed to decode participant record")?;
    Participant::try_from(record)
}

#[async_trait]
impl ParticipantStore for HttpParticipantStore {
    async fn fetch_all_participants(&self) -> Result<Vec<Participant>> {
        let body = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to fetch participants")?
            .error_for_status()
            .context("Failed to fetch participants")?
            .text()
            .await
            .context("Failed to read participant listing")?;
        decode_listing(&body)
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        let body = WireNewParticipant {
            name: &participant.name,
            wishlist: &participant.wishlist,
            pin: participant.pin.as_str(),
            is_claimed: false,
            drawn_match_id: None,
        };
        let text = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .context("Failed to add participant")?
            .error_for_status()
            .context("Failed to add participant")?
            .text()
            .await
            .context("Failed to read created participant")?;
        let created = decode_record(&text)?;
        debug!(participant_id = %created.id, "Participant created remotely");
        Ok(created)
    }

    async fn update_participant(&self, id: &str, patch: ParticipantPatch) -> Result<Participant> {
        let text = self
            .client
            .put(self.record_url(id))
            .json(&patch)
            .send()
            .await
            .with_context(|| format!("Failed to update participant {}", id))?
            .error_for_status()
            .with_context(|| format!("Failed to update participant {}", id))?
            .text()
            .await
            .with_context(|| format!("Failed to read updated participant {}", id))?;
        decode_record(&text)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        self.client
            .delete(self.record_url(id))
            .send()
            .await
            .with_context(|| format!("Failed to delete participant {}", id))?
            .error_for_status()
            .with_context(|| format!("Failed to delete participant {}", id))?;
        Ok(())
    }

    async fn fetch_event_config(&self) -> Result<EventConfig> {
        self.settings.fetch_event_config().await
    }

    async fn update_event_config(&self, config: EventConfig) -> Result<()> {
        self.settings.update_event_config(config).await
    }
}
