//! Voting sessions and their lifecycle.

use crate::error::VotingError;
use ballotbox_types::{SessionId, Timestamp, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The observable phase of a session at a given instant.
///
/// Only `is_open` is stored; `Expired` is derived from the clock on every
/// call and is never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Accepting ballots.
    Open,
    /// Deadline passed but the creator has not closed it: ballots are
    /// rejected, closing still succeeds.
    Expired,
    /// Closed by the creator; the winner is final.
    Closed,
}

/// One independent voting round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) creator: VoterId,
    /// Ballot order; also the tie-break order.
    pub(crate) candidates: Vec<String>,
    pub(crate) vote_counts: HashMap<String, u64>,
    pub(crate) voters: HashSet<VoterId>,
    pub(crate) created_at: Timestamp,
    pub(crate) deadline: Timestamp,
    pub(crate) is_open: bool,
    pub(crate) winner: Option<String>,
}

impl Session {
    /// Open a session with every tally at zero.
    ///
    /// The caller has already validated the candidate list.
    pub(crate) fn open(
        id: SessionId,
        creator: VoterId,
        candidates: Vec<String>,
        created_at: Timestamp,
        duration_minutes: u64,
    ) -> Self {
        let vote_counts = candidates.iter().map(|c| (c.clone(), 0)).collect();
        Self {
            id,
            creator,
            candidates,
            vote_counts,
            voters: HashSet::new(),
            created_at,
            deadline: created_at.plus_minutes(duration_minutes),
            is_open: true,
            winner: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn creator(&self) -> &VoterId {
        &self.creator
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn has_voted(&self, voter: &VoterId) -> bool {
        self.voters.contains(voter)
    }

    pub fn vote_count(&self, candidate: &str) -> Option<u64> {
        self.vote_counts.get(candidate).copied()
    }

    /// Number of ballots counted so far.
    pub fn total_votes(&self) -> u64 {
        self.vote_counts.values().sum()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Phase of this session as of `now`.
    pub fn phase(&self, now: Timestamp) -> SessionPhase {
        if !self.is_open {
            SessionPhase::Closed
        } else if self.deadline.has_passed(now) {
            SessionPhase::Expired
        } else {
            SessionPhase::Open
        }
    }

    /// The candidate with the highest tally; the first listed wins a tie.
    pub fn leading_candidate(&self) -> &str {
        let mut best: Option<(&str, u64)> = None;
        for name in &self.candidates {
            let count = self.vote_count(name).unwrap_or(0);
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((name.as_str(), count));
            }
        }
        // Candidate lists are never empty.
        best.map(|(name, _)| name).unwrap_or_default()
    }

    /// Tallies in ballot order.
    pub fn tallies(&self) -> Vec<(String, u64)> {
        self.candidates
            .iter()
            .map(|c| (c.clone(), self.vote_count(c).unwrap_or(0)))
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            creator: self.creator.clone(),
            candidates: self.candidates.clone(),
            deadline: self.deadline,
            is_open: self.is_open,
            winner: self.winner.clone(),
        }
    }

    /// Count one ballot. Fails without recording the voter if the candidate
    /// is not on the ballot.
    pub(crate) fn record_vote(
        &mut self,
        voter: VoterId,
        candidate: &str,
    ) -> Result<(), VotingError> {
        let count = self
            .vote_counts
            .get_mut(candidate)
            .ok_or_else(|| VotingError::InvalidCandidateName(candidate.to_string()))?;
        *count += 1;
        self.voters.insert(voter);
        Ok(())
    }

    /// Check the invariants a freshly created session starts with and every
    /// operation preserves. Used on sessions that did not come from
    /// `Session::open`.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        if self.candidates.is_empty() {
            return Err(format!("session {} has no candidates", self.id));
        }
        let mut seen = HashSet::with_capacity(self.candidates.len());
        for name in &self.candidates {
            if !seen.insert(name.as_str()) {
                return Err(format!("session {} lists {name:?} twice", self.id));
            }
        }
        if self.vote_counts.len() != self.candidates.len()
            || !self.candidates.iter().all(|c| self.vote_counts.contains_key(c))
        {
            return Err(format!(
                "session {} tallies do not match its candidates",
                self.id
            ));
        }
        if self.total_votes() != self.voter_count() as u64 {
            return Err(format!(
                "session {} counts {} votes from {} voters",
                self.id,
                self.total_votes(),
                self.voter_count()
            ));
        }
        if self.deadline <= self.created_at {
            return Err(format!("session {} ends before it starts", self.id));
        }
        match (&self.winner, self.is_open) {
            (None, true) => Ok(()),
            (Some(w), false) if self.vote_counts.contains_key(w) => Ok(()),
            (Some(w), false) => Err(format!(
                "session {} winner {w:?} is not a candidate",
                self.id
            )),
            (None, false) => Err(format!("session {} is closed without a winner", self.id)),
            (Some(_), true) => Err(format!("session {} is open with a winner", self.id)),
        }
    }

    /// Fix the winner and close. Returns the winner.
    pub(crate) fn close(&mut self) -> String {
        let winner = self.leading_candidate().to_string();
        self.winner = Some(winner.clone());
        self.is_open = false;
        winner
    }
}

/// Public view of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub creator: VoterId,
    pub candidates: Vec<String>,
    pub deadline: Timestamp,
    pub is_open: bool,
    /// `None` until the session is closed.
    pub winner: Option<String>,
}

/// Final report of a closed session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResults {
    pub session_id: SessionId,
    pub winner: String,
    /// `(candidate, votes)` in ballot order.
    pub tallies: Vec<(String, u64)>,
    pub total_votes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(name: &str) -> VoterId {
        VoterId::parse(format!("0x{name}")).unwrap()
    }

    fn session(candidates: &[&str]) -> Session {
        Session::open(
            SessionId::FIRST,
            voter("creator"),
            candidates.iter().map(|c| c.to_string()).collect(),
            Timestamp::new(1_000),
            10,
        )
    }

    #[test]
    fn open_session_starts_empty() {
        let s = session(&["Movie 1", "Movie 2"]);
        assert!(s.is_open());
        assert_eq!(s.deadline(), Timestamp::new(1_600));
        assert_eq!(s.vote_count("Movie 1"), Some(0));
        assert_eq!(s.vote_count("Movie 3"), None);
        assert_eq!(s.total_votes(), 0);
        assert_eq!(s.winner(), None);
    }

    #[test]
    fn phase_follows_clock_and_flag() {
        let mut s = session(&["a"]);
        assert_eq!(s.phase(Timestamp::new(1_600)), SessionPhase::Open);
        assert_eq!(s.phase(Timestamp::new(1_601)), SessionPhase::Expired);
        s.close();
        assert_eq!(s.phase(Timestamp::new(1_000)), SessionPhase::Closed);
    }

    #[test]
    fn tie_goes_to_first_listed() {
        let mut s = session(&["Movie 1", "Movie 2"]);
        s.record_vote(voter("a"), "Movie 2").unwrap();
        s.record_vote(voter("b"), "Movie 1").unwrap();
        assert_eq!(s.leading_candidate(), "Movie 1");
    }

    #[test]
    fn strict_leader_wins_regardless_of_order() {
        let mut s = session(&["a", "b", "c"]);
        s.record_vote(voter("1"), "c").unwrap();
        s.record_vote(voter("2"), "c").unwrap();
        s.record_vote(voter("3"), "a").unwrap();
        assert_eq!(s.leading_candidate(), "c");
    }

    #[test]
    fn no_votes_means_first_candidate_wins() {
        let mut s = session(&["x", "y"]);
        assert_eq!(s.close(), "x");
        assert_eq!(s.winner(), Some("x"));
        assert!(!s.is_open());
    }

    #[test]
    fn unknown_candidate_records_nothing() {
        let mut s = session(&["a"]);
        assert_eq!(
            s.record_vote(voter("1"), "ghost"),
            Err(VotingError::InvalidCandidateName("ghost".into()))
        );
        assert!(!s.has_voted(&voter("1")));
        assert_eq!(s.total_votes(), 0);
    }

    #[test]
    fn fresh_and_closed_sessions_are_consistent() {
        let mut s = session(&["a", "b"]);
        s.record_vote(voter("1"), "b").unwrap();
        assert_eq!(s.check_consistency(), Ok(()));
        s.close();
        assert_eq!(s.check_consistency(), Ok(()));
    }

    #[test]
    fn inconsistent_sessions_are_detected() {
        let mut empty = session(&["a"]);
        empty.candidates.clear();
        empty.vote_counts.clear();
        assert!(empty.check_consistency().is_err());

        let mut ghost = session(&["a"]);
        ghost.vote_counts = HashMap::from([("ghost".to_string(), 0)]);
        assert!(ghost.check_consistency().is_err());

        let mut no_winner = session(&["a"]);
        no_winner.is_open = false;
        assert!(no_winner.check_consistency().is_err());

        let mut bad_winner = session(&["a"]);
        bad_winner.close();
        bad_winner.winner = Some("ghost".into());
        assert!(bad_winner.check_consistency().is_err());

        let mut uncounted = session(&["a"]);
        uncounted.voters.insert(voter("1"));
        assert!(uncounted.check_consistency().is_err());
    }

    #[test]
    fn tallies_keep_ballot_order() {
        let mut s = session(&["b", "a"]);
        s.record_vote(voter("1"), "a").unwrap();
        assert_eq!(
            s.tallies(),
            vec![("b".to_string(), 0), ("a".to_string(), 1)]
        );
    }
}
