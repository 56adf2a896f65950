//! Fundamental types for the ballotbox workspace.
//!
//! Identities, session ids, timestamps and the clock abstraction shared by the
//! registry and its test doubles.

pub mod error;
pub mod identity;
pub mod session_id;
pub mod time;

pub use error::TypesError;
pub use identity::VoterId;
pub use session_id::SessionId;
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_MINUTE};
