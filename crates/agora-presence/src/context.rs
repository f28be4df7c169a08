//! Session-scoped owner of every presence component.

use std::sync::Arc;

use agora_common::{Event, EventBus, Presence, PresenceError};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::activity::{ActivityEmitter, ActivityHandle};
use crate::api::{HttpPresenceApi, PresenceApi, BEACON_TIMEOUT};
use crate::best_effort::best_effort;
use crate::credential::Session;
use crate::feed::FeedManager;
use crate::interest::{Interest, InterestRegistry};
use crate::store::PresenceStore;
use crate::tracker::PresenceTracker;

/// Everything presence-related for one logged-in user.
///
/// Built once per process; [`init`](Self::init) and
/// [`dispose`](Self::dispose) bracket each session.
pub struct PresenceContext {
    api: Arc<dyn PresenceApi>,
    events: EventBus,
    store: PresenceStore,
    tracker: PresenceTracker,
    feed: FeedManager,
    emitter: Option<ActivityEmitter>,
    session: Option<Session>,
}

impl PresenceContext {
    pub fn new(api: Arc<dyn PresenceApi>) -> Self {
        let events = EventBus::default();
        let store = PresenceStore::new(events.clone());
        let interests = InterestRegistry::new();
        let feed = FeedManager::new(store.clone(), interests.clone());
        let tracker =
            PresenceTracker::new(store.clone(), interests, feed.status(), Arc::clone(&api));
        Self {
            api,
            events,
            store,
            tracker,
            feed,
            emitter: None,
            session: None,
        }
    }

    /// Context talking to the real server over HTTP.
    pub fn with_http() -> Result<Self, PresenceError> {
        Ok(Self::new(Arc::new(HttpPresenceApi::new()?)))
    }

    /// Start presence for `session`: open the feed and begin reporting
    /// the local user's activity.
    ///
    /// Calling it again replaces the running feed and emitter. The store
    /// is kept when the user is unchanged.
    pub async fn init(&mut self, session: Session, status_message: Option<String>) {
        if let Some(mut emitter) = self.emitter.take() {
            emitter.stop().await;
        }
        let same_user = self
            .session
            .as_ref()
            .is_some_and(|s| s.user_id() == session.user_id());
        if self.session.is_some() && !same_user {
            self.feed.stop().await;
        }

        info!(user_id = %session.user_id(), endpoint = %session.endpoint, "Presence session starting");
        self.tracker.set_session(Some(session.clone()));
        self.feed.start(session.clone()).await;
        self.emitter = Some(ActivityEmitter::spawn(
            Arc::clone(&self.api),
            session.clone(),
            self.events.clone(),
            status_message,
        ));
        self.events.publish(Event::SessionStarted {
            user_id: session.user_id().to_string(),
        });
        self.session = Some(session);
    }

    /// Log out: announce `offline`, close the feed and forget all
    /// per-session state.
    pub async fn dispose(&mut self) {
        if let Some(mut emitter) = self.emitter.take() {
            emitter.stop().await;
        }
        self.tracker.set_session(None);
        if let Some(session) = self.session.take() {
            best_effort(
                "set_presence offline",
                self.api
                    .set_presence(&session, Presence::Offline, None)
                    .await,
            );
            self.events.publish(Event::SessionEnded);
            info!(user_id = %session.user_id(), "Presence session ended");
        }
        self.feed.stop().await;
    }

    /// Process is exiting: tear down the background tasks and send a final
    /// `offline`, waiting at most [`BEACON_TIMEOUT`] for it.
    pub async fn close_app(&mut self) {
        if let Some(mut emitter) = self.emitter.take() {
            emitter.abort();
        }
        self.feed.abort();
        self.tracker.set_session(None);
        if let Some(session) = self.session.take() {
            let beacon = self.api.beacon(&session, Presence::Offline);
            if tokio::time::timeout(BEACON_TIMEOUT, beacon).await.is_err() {
                warn!("Offline beacon timed out");
            }
        }
    }

    pub fn track(&self, user_id: &str) -> Interest {
        self.tracker.track(user_id)
    }

    pub fn get(&self, user_id: &str) -> Presence {
        self.store.get(user_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Input sink for the local user, while a session is active.
    pub fn activity(&self) -> Option<ActivityHandle> {
        self.emitter.as_ref().map(ActivityEmitter::handle)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_feed_connected(&self) -> bool {
        self.feed.is_connected()
    }

    pub fn store(&self) -> &PresenceStore {
        &self.store
    }
}
