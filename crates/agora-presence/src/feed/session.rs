//! Reconnect decisions for one feed session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::backoff::Backoff;

/// Backoff plus the intentional-close flag shared with the manager.
pub(crate) struct ReconnectState {
    backoff: Backoff,
    intentional_close: Arc<AtomicBool>,
}

impl ReconnectState {
    pub(crate) fn new(intentional_close: Arc<AtomicBool>) -> Self {
        Self {
            backoff: Backoff::default(),
            intentional_close,
        }
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.intentional_close.load(Ordering::Acquire)
    }

    pub(crate) fn on_open(&mut self) {
        self.backoff.reset();
    }

    /// Delay before the next attempt, or `None` once the close was asked for.
    pub(crate) fn on_close(&mut self) -> Option<Duration> {
        if self.is_closing() {
            return None;
        }
        Some(self.backoff.next_delay())
    }
}
