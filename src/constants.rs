//! Fixed limits and defaults for the assignment ledger.
//!
//! Every value here is a compile-time constant. Runtime-tunable values
//! (target count, claim retry bound) take their defaults from this module
//! and can be overridden through [`crate::config::AppConfig`].

// ============================================================================
// Participant identity
// ============================================================================

/// Number of ASCII digits in a participant PIN.
pub const PIN_LENGTH: usize = 4;

/// Upper bound on participant name length, in characters.
pub const MAX_NAME_CHARS: usize = 80;

/// Upper bound on wishlist length, in characters.
pub const MAX_WISHLIST_CHARS: usize = 500;

// ============================================================================
// Event defaults
// ============================================================================

/// Participants required before drawing unlocks, when nothing is configured.
pub const DEFAULT_TARGET_COUNT: u32 = 5;

/// Event summary shown to joiners when nothing is configured.
pub const DEFAULT_EVENT_SUMMARY: &str =
    "Welcome to our Holiday Gift Exchange! Please enter your name and what you'd like to receive.";

// ============================================================================
// Draw protocol
// ============================================================================

/// Conditional claim attempts per commit before giving up with a retryable error.
///
/// Each lost race removes the contested candidate from the local candidate
/// set, so a commit never loops longer than the pool is wide.
pub const DEFAULT_MAX_CLAIM_ATTEMPTS: u32 = 8;
