use std::time::Duration;

use agora_common::Presence;

/// Re-send `online` this often while the user is active, so the
/// server-side expiry never lapses.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2 * 60);

/// No qualifying input for this long demotes the user to `unavailable`.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(3 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    Online,
    Unavailable,
}

impl From<ActivityState> for Presence {
    fn from(state: ActivityState) -> Self {
        match state {
            ActivityState::Online => Presence::Online,
            ActivityState::Unavailable => Presence::Unavailable,
        }
    }
}

/// Input that counts as the user being present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Key,
    Scroll,
    Touch,
}
