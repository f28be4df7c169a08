//! Shared feed state and the commands sent to the connection task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Give up on a single connection attempt after this long.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// How long `stop()` waits for the connection task before aborting it.
pub(crate) const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Whether the live feed is currently open. Cheap to clone and to read
/// from any thread.
#[derive(Debug, Clone, Default)]
pub struct FeedStatus(Arc<AtomicBool>);

impl FeedStatus {
    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.0.store(connected, Ordering::Release);
    }
}

/// Commands sent from [`FeedManager`](super::FeedManager) to its task.
#[derive(Debug)]
pub(crate) enum FeedCommand {
    Close,
}
