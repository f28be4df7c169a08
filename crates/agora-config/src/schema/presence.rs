//! Presence configuration types.

use serde::{Deserialize, Serialize};

/// Presence system configuration.
///
/// Heartbeat and idle timings are fixed by the client and deliberately
/// absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub enabled: bool,
    /// Status message sent alongside the local presence. Empty means none.
    pub status_message: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            status_message: String::new(),
        }
    }
}

impl PresenceConfig {
    pub fn status_message(&self) -> Option<&str> {
        let msg = self.status_message.trim();
        (!msg.is_empty()).then_some(msg)
    }
}
