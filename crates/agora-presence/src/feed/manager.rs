//! Owner of the single live feed connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::connection::connection_loop;
use super::session::ReconnectState;
use super::types::{FeedCommand, FeedStatus, STOP_TIMEOUT};
use crate::credential::Session;
use crate::interest::InterestRegistry;
use crate::store::PresenceStore;

struct RunningFeed {
    intentional_close: Arc<AtomicBool>,
    command_tx: mpsc::Sender<FeedCommand>,
    task: JoinHandle<()>,
}

/// Keeps one live connection to the presence feed per session.
pub struct FeedManager {
    store: PresenceStore,
    interests: InterestRegistry,
    status: FeedStatus,
    running: Option<RunningFeed>,
}

impl FeedManager {
    pub fn new(store: PresenceStore, interests: InterestRegistry) -> Self {
        Self {
            store,
            interests,
            status: FeedStatus::default(),
            running: None,
        }
    }

    /// Open the feed for `session`, replacing any previous connection.
    ///
    /// The previous connection is closed intentionally so it never
    /// reconnects, and the new one starts with a fresh backoff.
    pub async fn start(&mut self, session: Session) {
        self.shutdown_running().await;

        let intentional_close = Arc::new(AtomicBool::new(false));
        let (command_tx, command_rx) = mpsc::channel(4);
        let task = tokio::spawn(connection_loop(
            session,
            self.store.clone(),
            self.status.clone(),
            ReconnectState::new(Arc::clone(&intentional_close)),
            command_rx,
        ));

        self.running = Some(RunningFeed {
            intentional_close,
            command_tx,
            task,
        });
        debug!("Presence feed started");
    }

    /// Close the feed for good and forget everything tied to the session:
    /// pending reconnects, interest counts and stored presence.
    pub async fn stop(&mut self) {
        self.shutdown_running().await;
        self.status.set_connected(false);
        self.interests.clear();
        self.store.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Whether a connection task exists (connected or backing off).
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn status(&self) -> FeedStatus {
        self.status.clone()
    }

    /// Kill the connection task without waiting. Session state is left
    /// alone; used when the process is about to exit.
    pub fn abort(&mut self) {
        if let Some(running) = self.running.take() {
            running.intentional_close.store(true, Ordering::Release);
            running.task.abort();
        }
        self.status.set_connected(false);
    }

    async fn shutdown_running(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.intentional_close.store(true, Ordering::Release);
        let _ = running.command_tx.try_send(FeedCommand::Close);
        drop(running.command_tx);

        let mut task = running.task;
        if tokio::time::timeout(STOP_TIMEOUT, &mut task).await.is_err() {
            warn!("Presence feed task did not stop in time, aborting");
            task.abort();
        }
        info!("Presence feed stopped");
    }
}

impl Drop for FeedManager {
    fn drop(&mut self) {
        self.abort();
    }
}
