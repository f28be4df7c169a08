//! Shared map of user id to last known presence.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use agora_common::{Event, EventBus, Presence};

/// Last-write-wins presence map shared by every observer.
///
/// Cloning is cheap and yields a handle to the same map. Changes are
/// announced on the [`EventBus`] as [`Event::PresenceChanged`].
#[derive(Clone)]
pub struct PresenceStore {
    entries: Arc<RwLock<HashMap<String, Presence>>>,
    events: EventBus,
}

impl PresenceStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Last known presence, `Offline` for users never seen.
    pub fn get(&self, user_id: &str) -> Presence {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    /// Whether a value has ever been recorded for `user_id`.
    pub fn contains(&self, user_id: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(user_id)
    }

    /// Record `presence` for `user_id`. Returns whether the stored value
    /// changed; only changes are published.
    pub fn upsert(&self, user_id: &str, presence: Presence) -> bool {
        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), presence);
        let changed = previous != Some(presence);
        if changed {
            self.events.publish(Event::PresenceChanged {
                user_id: user_id.to_string(),
                presence,
            });
        }
        changed
    }

    pub fn snapshot(&self) -> HashMap<String, Presence> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
