//! Two-state idle machine, driven by explicit timestamps.

use std::time::Duration;

use tokio::time::Instant;

use super::types::{ActivityState, IDLE_THRESHOLD};

/// Tracks the last qualifying input and derives `Online`/`Unavailable`.
///
/// Pure state: callers pass `now`, so the machine can be driven by a
/// real or a synthetic clock.
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    state: ActivityState,
    last_activity: Instant,
    idle_threshold: Duration,
}

impl ActivityMonitor {
    /// Starts `Online`, as on login.
    pub fn new(now: Instant) -> Self {
        Self::with_threshold(now, IDLE_THRESHOLD)
    }

    pub fn with_threshold(now: Instant, idle_threshold: Duration) -> Self {
        Self {
            state: ActivityState::Online,
            last_activity: now,
            idle_threshold,
        }
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// When the user becomes idle if no further input arrives.
    pub fn idle_deadline(&self) -> Instant {
        self.last_activity + self.idle_threshold
    }

    /// Note a qualifying input. Returns the new state on a transition.
    pub fn record_input(&mut self, now: Instant) -> Option<ActivityState> {
        if now > self.last_activity {
            self.last_activity = now;
        }
        match self.state {
            ActivityState::Unavailable => {
                self.state = ActivityState::Online;
                Some(ActivityState::Online)
            }
            ActivityState::Online => None,
        }
    }

    /// Demote to `Unavailable` once the idle threshold has been reached.
    pub fn check_idle(&mut self, now: Instant) -> Option<ActivityState> {
        if self.state == ActivityState::Online
            && now.saturating_duration_since(self.last_activity) >= self.idle_threshold
        {
            self.state = ActivityState::Unavailable;
            return Some(ActivityState::Unavailable);
        }
        None
    }

    /// Heartbeats only refresh an active user.
    pub fn heartbeat_due(&self) -> bool {
        self.state == ActivityState::Online
    }
}
