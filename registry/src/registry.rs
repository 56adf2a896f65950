//! The voting session registry: creates sessions, counts ballots, closes
//! sessions and reports results.
//!
//! Every mutating operation validates completely before touching state, so a
//! rejected call leaves the registry exactly as it was and emits no event.

use crate::config::RegistryConfig;
use crate::error::VotingError;
use crate::event::{EventBus, EventListener, VotingEvent};
use crate::session::{Session, SessionPhase, SessionResults, SessionSummary};
use crate::spans;
use ballotbox_types::{Clock, SessionId, VoterId};
use ballotbox_utils::{format_duration, StatsCounter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const STAT_SESSIONS_CREATED: &str = "sessions_created";
pub const STAT_VOTES_CAST: &str = "votes_cast";
pub const STAT_VOTES_REJECTED: &str = "votes_rejected";
pub const STAT_SESSIONS_CLOSED: &str = "sessions_closed";

const STAT_NAMES: &[&str] = &[
    STAT_SESSIONS_CREATED,
    STAT_VOTES_CAST,
    STAT_VOTES_REJECTED,
    STAT_SESSIONS_CLOSED,
];

/// Owns every session ever created, addressed by [`SessionId`].
pub struct VotingRegistry {
    /// Arena: `sessions[i].id == SessionId::new(i)`.
    sessions: Vec<Session>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    events: EventBus,
    stats: StatsCounter,
}

impl VotingRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, RegistryConfig::default())
    }

    pub fn with_config(clock: Arc<dyn Clock>, config: RegistryConfig) -> Self {
        Self {
            sessions: Vec::new(),
            clock,
            config,
            events: EventBus::new(),
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    /// Register a listener for every subsequent [`VotingEvent`].
    pub fn subscribe(&mut self, listener: EventListener) {
        self.events.subscribe(listener);
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// Open a new session on behalf of `creator`.
    ///
    /// The deadline is `now + duration_minutes`. A rejected call does not
    /// consume a session id.
    pub fn create_session(
        &mut self,
        creator: &VoterId,
        candidate_names: Vec<String>,
        duration_minutes: u64,
    ) -> Result<SessionId, VotingError> {
        let _span = spans::create_session_span(creator, candidate_names.len()).entered();

        if let Err(e) = self.validate_new_session(&candidate_names, duration_minutes) {
            debug!(error = %e, "session creation rejected");
            return Err(e);
        }

        let id = self.next_session_id();
        let now = self.clock.now();
        let session = Session::open(
            id,
            creator.clone(),
            candidate_names.clone(),
            now,
            duration_minutes,
        );
        info!(
            session = %id,
            deadline = %session.deadline(),
            window = %format_duration(session.deadline().secs_until(now)),
            "voting session created"
        );
        self.sessions.push(session);
        self.stats.increment(STAT_SESSIONS_CREATED);

        self.events.emit(&VotingEvent::SessionCreated {
            id,
            creator: creator.clone(),
            candidates: candidate_names,
        });
        Ok(id)
    }

    /// Cast `voter`'s single ballot in a session.
    ///
    /// Checks, in order: the session exists, it has not been closed, its
    /// deadline has not passed, the voter has not voted, the candidate is on
    /// the ballot.
    pub fn vote(
        &mut self,
        voter: &VoterId,
        session_id: SessionId,
        candidate_name: &str,
    ) -> Result<(), VotingError> {
        let _span = spans::vote_span(session_id, voter).entered();

        let result = self.try_vote(voter, session_id, candidate_name);
        match &result {
            Ok(()) => {
                self.stats.increment(STAT_VOTES_CAST);
                debug!(candidate = candidate_name, "vote counted");
                self.events.emit(&VotingEvent::VoteCast {
                    session_id,
                    voter: voter.clone(),
                    candidate: candidate_name.to_string(),
                });
            }
            Err(e) => {
                self.stats.increment(STAT_VOTES_REJECTED);
                debug!(error = %e, "vote rejected");
            }
        }
        result
    }

    fn try_vote(
        &mut self,
        voter: &VoterId,
        session_id: SessionId,
        candidate_name: &str,
    ) -> Result<(), VotingError> {
        let now = self.clock.now();
        let session = self.session_mut(session_id)?;

        // The flag and the clock are checked independently: an expired
        // session is still flagged open until its creator closes it.
        if !session.is_open {
            return Err(VotingError::VotingAlreadyEnded(session_id));
        }
        if session.deadline.has_passed(now) {
            return Err(VotingError::VotingAlreadyEnded(session_id));
        }
        if session.has_voted(voter) {
            return Err(VotingError::AlreadyVoted(voter.clone()));
        }
        // Rejects names that are not on the ballot before touching anything.
        session.record_vote(voter.clone(), candidate_name)
    }

    /// Close a session and fix its winner. Only the creator may do this, and
    /// only once. Closing does not depend on the deadline.
    ///
    /// Returns the winning candidate.
    pub fn end_voting(
        &mut self,
        caller: &VoterId,
        session_id: SessionId,
    ) -> Result<String, VotingError> {
        let _span = spans::end_voting_span(session_id, caller).entered();

        let result = self.try_end_voting(caller, session_id);
        match &result {
            Ok(winner) => {
                self.stats.increment(STAT_SESSIONS_CLOSED);
                info!(winner = %winner, "voting ended");
                self.events.emit(&VotingEvent::VotingEnded {
                    session_id,
                    winner: winner.clone(),
                });
            }
            Err(e) => debug!(error = %e, "end voting rejected"),
        }
        result
    }

    fn try_end_voting(
        &mut self,
        caller: &VoterId,
        session_id: SessionId,
    ) -> Result<String, VotingError> {
        let session = self.session_mut(session_id)?;
        if &session.creator != caller {
            return Err(VotingError::OnlySessionCreator);
        }
        if !session.is_open {
            return Err(VotingError::VotingAlreadyClosed(session_id));
        }
        Ok(session.close())
    }

    fn validate_new_session(
        &self,
        candidate_names: &[String],
        duration_minutes: u64,
    ) -> Result<(), VotingError> {
        if candidate_names.is_empty() {
            return Err(VotingError::InvalidCandidateList);
        }
        if candidate_names.len() > self.config.max_candidates {
            return Err(VotingError::TooManyCandidates {
                have: candidate_names.len(),
                max: self.config.max_candidates,
            });
        }
        let mut seen = HashSet::with_capacity(candidate_names.len());
        for name in candidate_names {
            if !seen.insert(name.as_str()) {
                return Err(VotingError::DuplicateCandidate(name.clone()));
            }
        }
        if duration_minutes == 0 || duration_minutes > self.config.max_duration_minutes {
            return Err(VotingError::InvalidDuration {
                minutes: duration_minutes,
                max: self.config.max_duration_minutes,
            });
        }
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        id.index().and_then(|i| self.sessions.get(i))
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut Session, VotingError> {
        id.index()
            .and_then(|i| self.sessions.get_mut(i))
            .ok_or(VotingError::SessionNotFound(id))
    }

    /// `(creator, candidates, deadline, is_open, winner)` of a session.
    pub fn summary(&self, id: SessionId) -> Option<SessionSummary> {
        self.session(id).map(Session::summary)
    }

    /// Whether `voter` has a ballot recorded in the session. False for
    /// unknown sessions.
    pub fn has_voted(&self, id: SessionId, voter: &VoterId) -> bool {
        self.session(id).is_some_and(|s| s.has_voted(voter))
    }

    /// Current tally of one candidate; `None` for an unknown session or name.
    pub fn vote_count(&self, id: SessionId, candidate: &str) -> Option<u64> {
        self.session(id).and_then(|s| s.vote_count(candidate))
    }

    /// Phase of the session right now.
    pub fn phase(&self, id: SessionId) -> Option<SessionPhase> {
        let now = self.clock.now();
        self.session(id).map(|s| s.phase(now))
    }

    /// Seconds until the deadline passes; zero once it has.
    pub fn remaining_secs(&self, id: SessionId) -> Option<u64> {
        let now = self.clock.now();
        self.session(id).map(|s| s.deadline().secs_until(now))
    }

    /// Final report of a closed session.
    pub fn results(&self, id: SessionId) -> Result<SessionResults, VotingError> {
        let session = self.session(id).ok_or(VotingError::SessionNotFound(id))?;
        let winner = session
            .winner()
            .ok_or(VotingError::SessionStillOpen(id))?
            .to_string();
        Ok(SessionResults {
            session_id: id,
            winner,
            tallies: session.tallies(),
            total_votes: session.total_votes(),
        })
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The id the next successful `create_session` will hand out.
    pub fn next_session_id(&self) -> SessionId {
        SessionId::new(self.sessions.len() as u64)
    }

    /// Ids of all sessions opened by `creator`, oldest first.
    pub fn sessions_by_creator(&self, creator: &VoterId) -> Vec<SessionId> {
        self.sessions
            .iter()
            .filter(|s| &s.creator == creator)
            .map(Session::id)
            .collect()
    }
}

/// Serializable snapshot of the registry's sessions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub sessions: Vec<Session>,
}

impl VotingRegistry {
    /// Serialize every session (tallies, ballots, flags) to bytes.
    ///
    /// Listeners and the clock are not part of the snapshot.
    pub fn save_state(&self) -> Result<Vec<u8>, VotingError> {
        let snapshot = RegistrySnapshot {
            sessions: self.sessions.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| VotingError::Snapshot(e.to_string()))
    }

    /// Rebuild a registry from [`save_state`](Self::save_state) bytes.
    ///
    /// Fails if the bytes do not decode, the session ids are not the dense
    /// sequence `0..n`, or any session breaks the invariants every live
    /// session keeps (non-empty distinct candidates, tallies keyed by exactly
    /// those candidates, one tally per recorded voter, a winner iff closed).
    pub fn load_state(
        data: &[u8],
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Result<Self, VotingError> {
        let snapshot: RegistrySnapshot =
            bincode::deserialize(data).map_err(|e| VotingError::Snapshot(e.to_string()))?;
        for (i, session) in snapshot.sessions.iter().enumerate() {
            if session.id.as_u64() != i as u64 {
                return Err(VotingError::Snapshot(format!(
                    "session at position {i} has id {}",
                    session.id
                )));
            }
            session.check_consistency().map_err(VotingError::Snapshot)?;
        }
        let mut registry = Self::with_config(clock, config);
        registry.sessions = snapshot.sessions;
        info!(sessions = registry.sessions.len(), "registry restored from snapshot");
        Ok(registry)
    }
}

impl std::fmt::Debug for VotingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingRegistry")
            .field("sessions", &self.sessions.len())
            .field("config", &self.config)
            .field("events", &self.events)
            .finish()
    }
}
