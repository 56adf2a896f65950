//! Events emitted on registry state transitions.

use ballotbox_types::{SessionId, VoterId};
use serde::{Deserialize, Serialize};

/// Registry-level events that observers can subscribe to via the [`EventBus`].
///
/// Exactly one event is emitted per successful mutating call, after the state
/// change has been applied. Failed calls emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    /// A new session was opened.
    SessionCreated {
        id: SessionId,
        creator: VoterId,
        candidates: Vec<String>,
    },
    /// A ballot was counted.
    VoteCast {
        session_id: SessionId,
        voter: VoterId,
        candidate: String,
    },
    /// The creator closed the session and the winner is final.
    VotingEnded {
        session_id: SessionId,
        winner: String,
    },
}

impl VotingEvent {
    /// The session this event concerns.
    pub fn session_id(&self) -> SessionId {
        match self {
            Self::SessionCreated { id, .. } => *id,
            Self::VoteCast { session_id, .. } | Self::VotingEnded { session_id, .. } => {
                *session_id
            }
        }
    }
}

pub type EventListener = Box<dyn Fn(&VotingEvent) + Send + Sync>;

/// Synchronous fan-out event bus for voting events.
///
/// Listeners are invoked inline on the emitting thread while the registry is
/// still borrowed; keep handlers fast and never call back into the registry.
pub struct EventBus {
    listeners: Vec<EventListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &VotingEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn voter() -> VoterId {
        VoterId::parse("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap()
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&VotingEvent::VotingEnded {
            session_id: SessionId::FIRST,
            winner: "Movie 1".into(),
        });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::default();
        assert_eq!(bus.listener_count(), 0);
        bus.emit(&VotingEvent::VoteCast {
            session_id: SessionId::FIRST,
            voter: voter(),
            candidate: "Movie 1".into(),
        });
    }

    #[test]
    fn session_id_of_each_variant() {
        let id = SessionId::new(3);
        let events = [
            VotingEvent::SessionCreated {
                id,
                creator: voter(),
                candidates: vec!["a".into()],
            },
            VotingEvent::VoteCast {
                session_id: id,
                voter: voter(),
                candidate: "a".into(),
            },
            VotingEvent::VotingEnded {
                session_id: id,
                winner: "a".into(),
            },
        ];
        assert!(events.iter().all(|e| e.session_id() == id));
    }
}
