//! Aggregate counts over the participant pool.

use serde::Serialize;

use crate::domain::participant::Participant;

/// Pool statistics shown on the host dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total: usize,
    /// Participants someone has drawn
    pub claimed: usize,
    /// Participants still available as recipients
    pub remaining: usize,
    /// Participants who have used their draw
    pub drawn: usize,
}

impl PoolStats {
    pub fn from_participants(participants: &[Participant]) -> Self {
        let claimed = participants.iter().filter(|p| p.is_claimed).count();
        Self {
            total: participants.len(),
            claimed,
            remaining: participants.len() - claimed,
            drawn: participants.iter().filter(|p| p.has_drawn()).count(),
        }
    }
}
