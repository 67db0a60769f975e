//! Match notifications and observer registration.
//!
//! Listeners subscribe explicitly and receive a [`SubscriptionId`]; they stay
//! registered until unsubscribed or the engine is dropped.

use crate::types::{MatchOutcome, Side};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::{debug, instrument, trace};

/// Notification emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// A move was applied to the board.
    MoveApplied {
        /// Cell index.
        index: usize,
        /// Side that moved.
        side: Side,
    },
    /// The turn passed to `active`.
    TurnChanged {
        /// Side now to move.
        active: Side,
    },
    /// The match finished.
    GameOver(MatchOutcome),
}

/// Receiving end of a channel subscription.
///
/// Sending never blocks, so the engine stays synchronous. Poll with
/// `try_recv` or [`drain_events`], or `recv().await` from an async task.
pub type EventReceiver = UnboundedReceiver<MatchEvent>;

/// Takes every event already queued on `rx`, oldest first.
pub fn drain_events(rx: &mut EventReceiver) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&MatchEvent)>;

/// Registry of event listeners, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback.
    #[instrument(skip(self, listener))]
    pub fn subscribe(&mut self, listener: impl FnMut(&MatchEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(?id, count = self.listeners.len(), "Listener subscribed");
        id
    }

    /// Registers a channel; every event is sent to the returned receiver.
    #[instrument(skip(self))]
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, EventReceiver) {
        let (tx, rx) = unbounded_channel();
        let id = self.subscribe(move |event| {
            if tx.send(*event).is_err() {
                trace!("Event receiver dropped");
            }
        });
        (id, rx)
    }

    /// Removes a listener. Returns false if the id was not registered.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        let removed = self.listeners.len() != before;
        debug!(?id, removed, "Listener unsubscribed");
        removed
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn notify(&mut self, event: &MatchEvent) {
        trace!(?event, "Notifying listeners");
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
