//! Nullable event sink: records registry events for assertions.

use ballotbox_registry::{EventListener, VotingEvent};
use std::sync::{Arc, Mutex, PoisonError};

/// Collects every [`VotingEvent`] it is subscribed to, in emission order.
///
/// Cloning yields another handle onto the same log.
#[derive(Clone, Debug, Default)]
pub struct NullEventLog {
    events: Arc<Mutex<Vec<VotingEvent>>>,
}

impl NullEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends to this log, ready for `VotingRegistry::subscribe`.
    pub fn listener(&self) -> EventListener {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &VotingEvent| {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        })
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<VotingEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<VotingEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}
