//! Event configuration and the draw gate it controls.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_SUMMARY, DEFAULT_TARGET_COUNT};
use crate::domain::validation::{self, ValidationResult};

/// Host-editable event settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    /// Participants required before anyone may draw
    pub target_count: u32,
    /// Free text shown on the join page
    pub event_summary: String,
}

impl EventConfig {
    pub fn new(target_count: u32, event_summary: impl Into<String>) -> ValidationResult<Self> {
        validation::validate_target_count(target_count)?;
        Ok(Self {
            target_count,
            event_summary: event_summary.into(),
        })
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_target_count(self.target_count)
    }

    /// Evaluate the draw gate for a pool of `joined` participants
    pub fn gate(&self, joined: usize) -> DrawGate {
        DrawGate {
            joined,
            target: self.target_count,
            unlocked: joined >= self.target_count as usize,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            event_summary: DEFAULT_EVENT_SUMMARY.to_string(),
        }
    }
}

/// Whether drawing is open, and how far the pool is from the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawGate {
    pub joined: usize,
    pub target: u32,
    pub unlocked: bool,
}

impl DrawGate {
    /// Participants still needed before drawing unlocks
    pub fn missing(&self) -> usize {
        (self.target as usize).saturating_sub(self.joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EventConfig::default();
        assert_eq!(config.target_count, 5);
        assert!(config.event_summary.starts_with("Welcome"));
    }

    #[test]
    fn test_gate_unlocks_at_target() {
        let config = EventConfig::new(3, "party").unwrap();
        assert!(!config.gate(2).unlocked);
        assert_eq!(config.gate(2).missing(), 1);
        assert!(config.gate(3).unlocked);
        assert!(config.gate(7).unlocked);
        assert_eq!(config.gate(7).missing(), 0);
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(EventConfig::new(0, "party").is_err());
    }

    #[test]
    fn test_config_serde_camel_case() {
        let json = serde_json::to_value(EventConfig::new(4, "x").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "targetCount": 4, "eventSummary": "x" }));
    }
}
