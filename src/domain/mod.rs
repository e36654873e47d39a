//! Domain layer - Participants, draw rules, and the draw session machine
//!
//! Everything in here is storage-agnostic and side-effect free. The
//! [`crate::ledger`] module combines these types with a
//! [`crate::persistent_store::ParticipantStore`] and a
//! [`crate::random_source::RandomSource`].

pub mod errors;
pub mod event_config;
pub mod participant;
pub mod pool_stats;
pub mod state_machine;
pub mod validation;


pub use errors::{DrawError, ErrorSeverity, LedgerResult};
pub use event_config::{DrawGate, EventConfig};
pub use participant::{NewParticipant, Participant, ParticipantId, ParticipantPatch, ParticipantSummary, Pin};
pub use pool_stats::PoolStats;
pub use state_machine::{DrawEvent, DrawSession, SessionTransitionError};
pub use validation::ValidationError;
