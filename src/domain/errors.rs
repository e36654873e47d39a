//! Domain Errors Module
//!
//! Typed errors for the assignment ledger. Store adapters speak
//! `anyhow::Result`; anything that is not already a [`DrawError`] crosses
//! into the domain as [`DrawError::PersistenceFailure`].

use crate::domain::participant::ParticipantId;
use crate::domain::state_machine::SessionTransitionError;
use crate::domain::validation::ValidationError;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, DrawError>;

/// Ledger error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// No unclaimed participant other than the drawer is left
    #[error("No eligible recipients left for {drawer_id}")]
    Exhausted { drawer_id: ParticipantId },

    /// Drawer or referenced match id is missing from the store
    #[error("Participant not found: {id}")]
    NotFound { id: ParticipantId },

    /// Storage read or write failed; callers may retry
    #[error("Persistence failure: {0:#}")]
    PersistenceFailure(anyhow::Error),

    /// PIN did not match the stored PIN
    #[error("PIN does not match for participant {id}")]
    AuthFailure { id: ParticipantId },

    /// The drawer has already used their single draw
    #[error("Participant {drawer_id} has already drawn {match_id}")]
    AlreadyDrawn {
        drawer_id: ParticipantId,
        match_id: ParticipantId,
    },

    /// Fewer participants than the event target have joined
    #[error("Drawing is locked: {joined} of {target} participants joined")]
    Locked { joined: usize, target: u32 },

    /// A claim cannot be released while a recorded draw points at it
    #[error("Participant {id} is the recorded match of {drawer_id}")]
    MatchReferenced {
        id: ParticipantId,
        drawer_id: ParticipantId,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionTransitionError),
}

impl From<anyhow::Error> for DrawError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DrawError>() {
            Ok(draw_err) => draw_err,
            Err(err) => DrawError::PersistenceFailure(err),
        }
    }
}

/// Error severity for logging and user feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Expected outcome or user error
    Info,
    /// Recoverable, retry possible
    Warning,
    /// Data integrity at risk
    Error,
}

impl DrawError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DrawError::Exhausted { .. }
            | DrawError::AuthFailure { .. }
            | DrawError::AlreadyDrawn { .. }
            | DrawError::Locked { .. }
            | DrawError::MatchReferenced { .. }
            | DrawError::Validation(_) => ErrorSeverity::Info,
            DrawError::PersistenceFailure(_) | DrawError::Session(_) => ErrorSeverity::Warning,
            DrawError::NotFound { .. } => ErrorSeverity::Error,
        }
    }

    /// Only storage failures may succeed on a plain retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, DrawError::PersistenceFailure(_))
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            DrawError::Exhausted { .. } => "EXHAUSTED",
            DrawError::NotFound { .. } => "NOT_FOUND",
            DrawError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            DrawError::AuthFailure { .. } => "AUTH_FAILURE",
            DrawError::AlreadyDrawn { .. } => "ALREADY_DRAWN",
            DrawError::Locked { .. } => "LOCKED",
            DrawError::MatchReferenced { .. } => "MATCH_REFERENCED",
            DrawError::Validation(_) => "VALIDATION_ERROR",
            DrawError::Session(_) => "INVALID_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_anyhow_wraps_as_persistence_failure() {
        let err: DrawError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, DrawError::PersistenceFailure(_)));
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "PERSISTENCE_FAILURE");
    }

    #[test]
    fn test_anyhow_preserves_domain_errors() {
        let inner = anyhow::Error::new(DrawError::NotFound { id: "x".to_string() });
        let err: DrawError = inner.into();
        assert!(matches!(err, DrawError::NotFound { ref id } if id == "x"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_persistence_failure_displays_context_chain() {
        let res: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err: DrawError = res.context("Failed to update participant p1").unwrap_err().into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to update participant p1"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            DrawError::Exhausted { drawer_id: "a".to_string() }.severity(),
            ErrorSeverity::Info
        );
        assert_eq!(DrawError::NotFound { id: "a".to_string() }.severity(), ErrorSeverity::Error);
    }
}
