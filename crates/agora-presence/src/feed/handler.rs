//! Applying inbound feed frames to the store.

use tracing::debug;

use crate::protocol::PresenceDelta;
use crate::store::PresenceStore;

/// Apply one text frame. Malformed frames are dropped; returns whether
/// the frame was a valid delta.
pub(crate) fn apply_text(text: &str, store: &PresenceStore) -> bool {
    match PresenceDelta::parse(text) {
        Some(delta) => {
            debug!(user_id = %delta.user_id, presence = %delta.presence, "Presence delta");
            store.upsert(&delta.user_id, delta.presence);
            true
        }
        None => {
            debug!(len = text.len(), "Dropping malformed presence frame");
            false
        }
    }
}
