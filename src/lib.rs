//! Gift-exchange draw ledger.
//!
//! Participants join a shared pool with a name, a wishlist and a 4-digit PIN.
//! Each participant draws exactly one other, unclaimed participant; a drawn
//! participant can never be drawn again, and a drawer who comes back sees
//! the same result instead of drawing anew.
//!
//! - [`domain`]: records, validation, errors and the draw session machine
//! - [`ledger`]: the draw rules over a [`persistent_store::ParticipantStore`]
//! - [`storage`]: in-memory, JSON file and HTTP store adapters
//! - [`config`]: layered configuration (defaults, TOML file, environment)

pub mod config;
pub mod constants;
pub mod domain;
pub mod ledger;
pub mod persistent_store;
pub mod random_source;
pub mod storage;

pub use config::AppConfig;
pub use domain::{DrawError, DrawSession, LedgerResult, NewParticipant, Participant, ParticipantSummary};
pub use ledger::AssignmentLedger;
pub use persistent_store::ParticipantStore;
pub use random_source::RandomSource;
