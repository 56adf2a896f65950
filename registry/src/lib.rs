//! Voting session registry.
//!
//! Anyone can open a session with a fixed, ordered list of candidates and a
//! voting window measured in minutes. Each identity casts at most one ballot
//! per session. A ballot is accepted only while the session is open AND its
//! deadline has not passed; the two conditions are checked independently.
//! The creator closes the session, which fixes the winner: the candidate with
//! the most votes, the first listed winning a tie.
//!
//! Every successful transition emits a [`VotingEvent`] to subscribed
//! listeners.

pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod session;
pub mod shared;
pub mod spans;

pub use config::RegistryConfig;
pub use error::VotingError;
pub use event::{EventBus, EventListener, VotingEvent};
pub use registry::{RegistrySnapshot, VotingRegistry};
pub use session::{Session, SessionPhase, SessionResults, SessionSummary};
pub use shared::SharedRegistry;
