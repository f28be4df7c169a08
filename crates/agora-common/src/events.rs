use tokio::sync::broadcast;
use tracing::trace;

use crate::types::Presence;

/// In-process notifications fanned out by [`EventBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tracked or pushed user changed presence.
    PresenceChanged { user_id: String, presence: Presence },
    /// The local user's own presence was sent to the server.
    SelfPresenceChanged(Presence),
    FeedConnected,
    FeedDisconnected,
    SessionStarted { user_id: String },
    SessionEnded,
}

/// Broadcast fan-out for [`Event`]s. Cloning shares the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: Event) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(broadcast::error::SendError(event)) => {
                trace!(?event, "Event dropped, no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
