//! Nullable infrastructure for deterministic testing.
//!
//! The registry depends on two outside effects: the current time and whoever
//! listens to its events. This crate provides test-friendly versions of both
//! that return deterministic values and can be driven programmatically.
//!
//! Usage: hand an `Arc<NullClock>` to the registry in place of `SystemClock`
//! and subscribe a `NullEventLog` listener.

pub mod clock;
pub mod events;

pub use clock::NullClock;
pub use events::NullEventLog;
