//! Participant records and the partial updates the draw protocol writes.
//!
//! A participant carries two independent pieces of draw state:
//! - `is_claimed`: someone else has drawn this participant as their recipient
//! - `drawn_match_id`: whom this participant drew (set at most once)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::domain::validation::{self, ValidationError, ValidationResult};

/// Participant identifier as issued by the backing store
pub type ParticipantId = String;

/// Four-digit shared secret chosen at registration.
///
/// `Debug` output is masked so PINs never end up in logs. Comparison goes
/// through [`Pin::matches`], which does not short-circuit on the first
/// differing digit.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(String);

impl Pin {
    /// Parse and validate a PIN
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        validation::validate_pin(raw)?;
        Ok(Self(raw.to_string()))
    }

    /// Compare against a candidate PIN without early exit on mismatch
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Pin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// A registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub wishlist: String,
    pub pin: Pin,
    /// True once another participant has drawn this one
    #[serde(default)]
    pub is_claimed: bool,
    /// Recipient this participant drew, once they have drawn
    #[serde(default)]
    pub drawn_match_id: Option<ParticipantId>,
}

impl Participant {
    /// Whether this participant has already used their draw
    pub fn has_drawn(&self) -> bool {
        self.drawn_match_id.is_some()
    }

    /// Whether this participant may be drawn by `drawer_id`
    pub fn is_candidate_for(&self, drawer_id: &str) -> bool {
        !self.is_claimed && self.id != drawer_id
    }

    /// Public view: everything except the PIN and draw bookkeeping
    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            wishlist: self.wishlist.clone(),
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &ParticipantPatch) {
        if let Some(is_claimed) = patch.is_claimed {
            self.is_claimed = is_claimed;
        }
        if let Some(drawn_match_id) = &patch.drawn_match_id {
            self.drawn_match_id = drawn_match_id.clone();
        }
    }
}

/// Fields revealed to a drawer about their recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: ParticipantId,
    pub name: String,
    pub wishlist: String,
}

/// Validated registration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub name: String,
    pub wishlist: String,
    pub pin: Pin,
}

impl NewParticipant {
    /// Trim and validate raw registration fields
    pub fn new(name: &str, wishlist: &str, pin: &str) -> ValidationResult<Self> {
        Ok(Self {
            name: validation::validate_name(name)?,
            wishlist: validation::validate_wishlist(wishlist)?,
            pin: Pin::parse(pin)?,
        })
    }

    /// Materialize a record with a store-issued id and empty draw state
    pub fn into_participant(self, id: ParticipantId) -> Participant {
        Participant {
            id,
            name: self.name,
            wishlist: self.wishlist,
            pin: self.pin,
            is_claimed: false,
            drawn_match_id: None,
        }
    }
}

/// Partial update written through `ParticipantStore::update_participant`.
///
/// `None` leaves a field untouched. For `drawn_match_id`, `Some(None)`
/// clears the field (used only when a referenced recipient is deleted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_claimed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawn_match_id: Option<Option<ParticipantId>>,
}

impl ParticipantPatch {
    pub fn claimed(is_claimed: bool) -> Self {
        Self {
            is_claimed: Some(is_claimed),
            ..Self::default()
        }
    }

    pub fn drawn_match(match_id: impl Into<ParticipantId>) -> Self {
        Self {
            drawn_match_id: Some(Some(match_id.into())),
            ..Self::default()
        }
    }

    pub fn clear_drawn_match() -> Self {
        Self {
            drawn_match_id: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_claimed.is_none() && self.drawn_match_id.is_none()
    }
}
