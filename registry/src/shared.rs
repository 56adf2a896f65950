//! Thread-safe handle onto a single registry.
//!
//! Each mutation holds the write lock across its whole check-then-apply
//! sequence, so two ballots from the same identity can never both pass the
//! membership check. Queries take the read lock and always observe the most
//! recent committed write.

use crate::error::VotingError;
use crate::event::EventListener;
use crate::registry::VotingRegistry;
use crate::session::{SessionPhase, SessionResults, SessionSummary};
use ballotbox_types::{SessionId, VoterId};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable, `Send + Sync` wrapper around a [`VotingRegistry`].
///
/// A poisoned lock is recovered rather than propagated: operations never
/// leave a session half-updated, so the state behind it is consistent.
#[derive(Clone, Debug)]
pub struct SharedRegistry {
    inner: Arc<RwLock<VotingRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: VotingRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, VotingRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VotingRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, listener: EventListener) {
        self.write().subscribe(listener);
    }

    pub fn create_session(
        &self,
        creator: &VoterId,
        candidate_names: Vec<String>,
        duration_minutes: u64,
    ) -> Result<SessionId, VotingError> {
        self.write()
            .create_session(creator, candidate_names, duration_minutes)
    }

    pub fn vote(
        &self,
        voter: &VoterId,
        session_id: SessionId,
        candidate_name: &str,
    ) -> Result<(), VotingError> {
        self.write().vote(voter, session_id, candidate_name)
    }

    pub fn end_voting(
        &self,
        caller: &VoterId,
        session_id: SessionId,
    ) -> Result<String, VotingError> {
        self.write().end_voting(caller, session_id)
    }

    pub fn summary(&self, id: SessionId) -> Option<SessionSummary> {
        self.read().summary(id)
    }

    pub fn has_voted(&self, id: SessionId, voter: &VoterId) -> bool {
        self.read().has_voted(id, voter)
    }

    pub fn vote_count(&self, id: SessionId, candidate: &str) -> Option<u64> {
        self.read().vote_count(id, candidate)
    }

    pub fn phase(&self, id: SessionId) -> Option<SessionPhase> {
        self.read().phase(id)
    }

    pub fn results(&self, id: SessionId) -> Result<SessionResults, VotingError> {
        self.read().results(id)
    }

    pub fn session_count(&self) -> usize {
        self.read().session_count()
    }

    /// Run `f` with shared access to the underlying registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&VotingRegistry) -> R) -> R {
        f(&self.read())
    }
}
