//! Background task that reports the local user's presence to the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use agora_common::{Event, EventBus, Presence};

use super::monitor::ActivityMonitor;
use super::types::{ActivityState, InputKind, HEARTBEAT_INTERVAL};
use crate::api::PresenceApi;
use crate::best_effort::best_effort;
use crate::credential::Session;

const COMMAND_CAPACITY: usize = 64;
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
enum EmitterCommand {
    Input(InputKind),
    StatusMessage(Option<String>),
    Stop,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cheap, cloneable handle for feeding input events to the emitter.
#[derive(Clone)]
pub struct ActivityHandle {
    command_tx: mpsc::Sender<EmitterCommand>,
}

impl ActivityHandle {
    /// Report a qualifying input event. Never blocks; if the queue is full
    /// the event is redundant anyway.
    pub fn record_input(&self, kind: InputKind) {
        let _ = self.command_tx.try_send(EmitterCommand::Input(kind));
    }

    /// Change the status message carried on every presence update and
    /// re-send the current state with it.
    pub fn set_status_message(&self, message: Option<String>) {
        if let Err(e) = self
            .command_tx
            .try_send(EmitterCommand::StatusMessage(message))
        {
            warn!(error = %e, "Failed to queue status message update");
        }
    }
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Runs the heartbeat/idle machine for one logged-in session.
pub struct ActivityEmitter {
    command_tx: mpsc::Sender<EmitterCommand>,
    task: Option<JoinHandle<()>>,
}

impl ActivityEmitter {
    /// Start the emitter. `online` is sent immediately.
    pub fn spawn(
        api: Arc<dyn PresenceApi>,
        session: Session,
        events: EventBus,
        status_message: Option<String>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let task = tokio::spawn(run_emitter(
            api,
            session,
            events,
            status_message,
            command_rx,
        ));
        Self {
            command_tx,
            task: Some(task),
        }
    }

    pub fn handle(&self) -> ActivityHandle {
        ActivityHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Stop all timers and wait for the task to finish.
    pub async fn stop(&mut self) {
        let Some(mut task) = self.task.take() else {
            return;
        };
        let _ = self.command_tx.send(EmitterCommand::Stop).await;
        if tokio::time::timeout(STOP_TIMEOUT, &mut task).await.is_err() {
            warn!("Activity emitter did not stop in time, aborting");
            task.abort();
        }
    }

    /// Stop without waiting, for teardown paths that cannot await.
    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for ActivityEmitter {
    fn drop(&mut self) {
        self.abort();
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

async fn run_emitter(
    api: Arc<dyn PresenceApi>,
    session: Session,
    events: EventBus,
    mut status_message: Option<String>,
    mut command_rx: mpsc::Receiver<EmitterCommand>,
) {
    let started = Instant::now();
    let mut monitor = ActivityMonitor::new(started);
    info!(user_id = %session.user_id(), "Activity emitter started");

    announce(&*api, &session, &events, ActivityState::Online, status_message.as_deref()).await;

    let mut heartbeat = tokio::time::interval_at(started + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let online = monitor.state() == ActivityState::Online;
        let idle_deadline = monitor.idle_deadline();

        tokio::select! {
            _ = heartbeat.tick() => {
                if monitor.heartbeat_due() {
                    debug!("Presence heartbeat");
                    post(&*api, &session, Presence::Online, status_message.as_deref()).await;
                }
            }
            _ = tokio::time::sleep_until(idle_deadline), if online => {
                if let Some(state) = monitor.check_idle(Instant::now()) {
                    info!("User idle, marking unavailable");
                    announce(&*api, &session, &events, state, status_message.as_deref()).await;
                }
            }
            command = command_rx.recv() => match command {
                Some(EmitterCommand::Input(kind)) => {
                    trace!(?kind, "Activity input");
                    if let Some(state) = monitor.record_input(Instant::now()) {
                        info!("User active again, marking online");
                        announce(&*api, &session, &events, state, status_message.as_deref()).await;
                    }
                }
                Some(EmitterCommand::StatusMessage(message)) => {
                    status_message = message;
                    post(&*api, &session, monitor.state().into(), status_message.as_deref()).await;
                }
                Some(EmitterCommand::Stop) | None => break,
            }
        }
    }

    debug!("Activity emitter stopped");
}

/// Send a transition and tell observers about it.
async fn announce(
    api: &dyn PresenceApi,
    session: &Session,
    events: &EventBus,
    state: ActivityState,
    status_message: Option<&str>,
) {
    let presence = Presence::from(state);
    post(api, session, presence, status_message).await;
    events.publish(Event::SelfPresenceChanged(presence));
}

async fn post(
    api: &dyn PresenceApi,
    session: &Session,
    presence: Presence,
    status_message: Option<&str>,
) {
    best_effort(
        "set_presence",
        api.set_presence(session, presence, status_message).await,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    fn session() -> Session {
        crate::testing::session("@alice:home")
    }

    fn presences(calls: &[(Duration, Presence)]) -> Vec<Presence> {
        calls.iter().map(|(_, p)| *p).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn idle_for_ten_minutes_sends_no_heartbeat_while_idle() {
        let api = RecordingApi::new();
        let events = EventBus::new(64);
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), events, None);

        tokio::time::sleep(Duration::from_secs(600)).await;
        emitter.stop().await;

        let calls = api.set_calls();
        let idle_at = Duration::from_secs(180);
        assert_eq!(calls.first(), Some(&(Duration::ZERO, Presence::Online)));
        assert!(calls.contains(&(idle_at, Presence::Unavailable)));
        // Only the refresh that fell before the idle transition.
        assert_eq!(
            calls,
            vec![
                (Duration::ZERO, Presence::Online),
                (HEARTBEAT_INTERVAL, Presence::Online),
                (idle_at, Presence::Unavailable),
            ]
        );
        assert!(calls.iter().all(|(t, _)| *t <= idle_at));
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_refreshes_while_active() {
        let api = RecordingApi::new();
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), EventBus::new(64), None);
        let handle = emitter.handle();

        // Input every minute keeps the user online for ten minutes.
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_secs(60)).await;
            handle.record_input(InputKind::Pointer);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        emitter.stop().await;

        let calls = api.set_calls();
        assert!(presences(&calls).iter().all(|p| *p == Presence::Online));
        // Initial send plus heartbeats at 2, 4, 6, 8 and 10 minutes.
        assert_eq!(calls.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn input_after_idle_goes_back_online() {
        let api = RecordingApi::new();
        let events = EventBus::new(64);
        let mut rx = events.subscribe();
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), events, None);
        let handle = emitter.handle();

        // Between the 4 and 6 minute heartbeats.
        tokio::time::sleep(Duration::from_secs(250)).await;
        handle.record_input(InputKind::Key);
        tokio::time::sleep(Duration::from_millis(1)).await;
        emitter.stop().await;

        assert_eq!(
            presences(&api.set_calls()),
            vec![
                Presence::Online,
                Presence::Online,
                Presence::Unavailable,
                Presence::Online
            ]
        );
        let mut announced = Vec::new();
        while let Ok(Event::SelfPresenceChanged(p)) = rx.try_recv() {
            announced.push(p);
        }
        assert_eq!(
            announced,
            vec![Presence::Online, Presence::Unavailable, Presence::Online]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn status_message_is_resent_and_kept() {
        let api = RecordingApi::new();
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), EventBus::new(64), None);
        let handle = emitter.handle();

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.set_status_message(Some("in a meeting".into()));
        tokio::time::sleep(Duration::from_secs(120)).await;
        emitter.stop().await;

        let messages = api.status_messages();
        assert_eq!(messages[0], None);
        assert_eq!(messages[1].as_deref(), Some("in a meeting"));
        // The heartbeat at 2 minutes carries the new message.
        assert_eq!(messages[2].as_deref(), Some("in a meeting"));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_leaves_no_timers_behind() {
        let api = RecordingApi::new();
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), EventBus::new(64), None);
        tokio::time::sleep(Duration::from_millis(1)).await;
        emitter.stop().await;
        assert!(!emitter.is_running());

        let before = api.set_calls().len();
        tokio::time::sleep(Duration::from_secs(900)).await;
        assert_eq!(api.set_calls().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_server_does_not_stop_the_machine() {
        let api = RecordingApi::failing();
        let mut emitter = ActivityEmitter::spawn(api.clone(), session(), EventBus::new(64), None);
        tokio::time::sleep(Duration::from_secs(200)).await;
        assert!(emitter.is_running());
        emitter.stop().await;
        assert_eq!(
            presences(&api.set_calls()),
            vec![Presence::Online, Presence::Online, Presence::Unavailable]
        );
    }
}
