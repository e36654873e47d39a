//! Draw Session State Machine - Client-Observed Draw Flow
//!
//! Models one drawing session as an explicit sum type with a pure transition
//! function. Rendering layers observe the state; only [`DrawSession::apply`]
//! changes it.
//!
//! State Machine:
//! ```text
//!   Idle ──Start──> Drawing ──Committed──> Dropped ──Open──> Revealed
//!    │                 │  └────Exhausted──> Empty
//!    │                 └──Failed/Abandon──> Idle
//!    └──Resume──> Revealed
//!
//!   any ──Reset──> Idle
//! ```
//!
//! Terminal-until-reset states: Revealed, Empty

use std::fmt;

use crate::domain::participant::ParticipantSummary;

/// Per-session draw state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DrawSession {
    /// Waiting for the drawer to start
    #[default]
    Idle,
    /// A commit is in flight
    Drawing,
    /// The commit succeeded; the result waits for a manual reveal
    Dropped(ParticipantSummary),
    /// The result is shown
    Revealed(ParticipantSummary),
    /// No eligible candidate was left for this drawer
    Empty,
}

/// Inputs that move a session between states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawEvent {
    /// Drawer pressed start
    Start,
    /// Commit returned a recipient
    Committed(ParticipantSummary),
    /// Commit reported an exhausted pool
    Exhausted,
    /// Commit failed for any other reason
    Failed,
    /// Caller gave up on the pending commit
    Abandon,
    /// Drawer opened the dropped capsule
    Open,
    /// Drawer re-entered with a prior result on record
    Resume(ParticipantSummary),
    /// Back to idle from anywhere
    Reset,
}

/// Rejected session transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid draw session transition: {event} while {from}")]
pub struct SessionTransitionError {
    pub from: &'static str,
    pub event: &'static str,
}

impl DrawSession {
    /// Apply an event, returning the next state
    ///
    /// # Examples
    ///
    /// ```
    /// use gacha_ledger::domain::state_machine::{DrawEvent, DrawSession};
    ///
    /// let drawing = DrawSession::Idle.apply(DrawEvent::Start).unwrap();
    /// assert_eq!(drawing, DrawSession::Drawing);
    ///
    /// // Opening a capsule that never dropped is rejected
    /// assert!(DrawSession::Idle.apply(DrawEvent::Open).is_err());
    /// ```
    pub fn apply(self, event: DrawEvent) -> Result<DrawSession, SessionTransitionError> {
        use DrawEvent as E;
        use DrawSession as S;

        match (self, event) {
            (_, E::Reset) => Ok(S::Idle),

            (S::Idle, E::Start) => Ok(S::Drawing),
            (S::Idle, E::Resume(result)) => Ok(S::Revealed(result)),

            (S::Drawing, E::Committed(result)) => Ok(S::Dropped(result)),
            (S::Drawing, E::Exhausted) => Ok(S::Empty),
            (S::Drawing, E::Failed) | (S::Drawing, E::Abandon) => Ok(S::Idle),

            (S::Dropped(result), E::Open) => Ok(S::Revealed(result)),

            (from, event) => Err(SessionTransitionError {
                from: from.name(),
                event: event.name(),
            }),
        }
    }

    /// Revealed and Empty only leave via Reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, DrawSession::Revealed(_) | DrawSession::Empty)
    }

    /// Recipient carried by the session, if any
    pub fn result(&self) -> Option<&ParticipantSummary> {
        match self {
            DrawSession::Dropped(result) | DrawSession::Revealed(result) => Some(result),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DrawSession::Idle => "idle",
            DrawSession::Drawing => "drawing",
            DrawSession::Dropped(_) => "dropped",
            DrawSession::Revealed(_) => "revealed",
            DrawSession::Empty => "empty",
        }
    }
}

impl fmt::Display for DrawSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl DrawEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DrawEvent::Start => "start",
            DrawEvent::Committed(_) => "committed",
            DrawEvent::Exhausted => "exhausted",
            DrawEvent::Failed => "failed",
            DrawEvent::Abandon => "abandon",
            DrawEvent::Open => "open",
            DrawEvent::Resume(_) => "resume",
            DrawEvent::Reset => "reset",
        }
    }
}
