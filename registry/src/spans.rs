//! Pre-built [`tracing::Span`] constructors for registry operations.
//!
//! Consistent span names and fields make it easy to correlate a rejected call
//! with the session and identity involved.

use ballotbox_types::{SessionId, VoterId};
use tracing::{info_span, Span};

/// Span covering the creation of a session.
pub fn create_session_span(creator: &VoterId, candidates: usize) -> Span {
    info_span!("create_session", creator = %creator, candidates)
}

/// Span covering a single ballot.
pub fn vote_span(session: SessionId, voter: &VoterId) -> Span {
    info_span!("vote", session = %session, voter = %voter)
}

/// Span covering an explicit close by the creator.
pub fn end_voting_span(session: SessionId, caller: &VoterId) -> Span {
    info_span!("end_voting", session = %session, caller = %caller)
}
