use ballotbox_types::{SessionId, VoterId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VotingError {
    #[error("a session needs at least one candidate")]
    InvalidCandidateList,

    #[error("candidate {0:?} is listed more than once")]
    DuplicateCandidate(String),

    #[error("too many candidates: {have} > {max}")]
    TooManyCandidates { have: usize, max: usize },

    #[error("invalid duration: {minutes} minutes (allowed 1..={max})")]
    InvalidDuration { minutes: u64, max: u64 },

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("candidate {0:?} is not on the ballot")]
    InvalidCandidateName(String),

    #[error("{0} has already voted in this session")]
    AlreadyVoted(VoterId),

    #[error("voting in session {0} has already ended")]
    VotingAlreadyEnded(SessionId),

    #[error("session {0} is already closed")]
    VotingAlreadyClosed(SessionId),

    #[error("only the session creator can end voting")]
    OnlySessionCreator,

    #[error("session {0} is still open, results are not final")]
    SessionStillOpen(SessionId),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}
