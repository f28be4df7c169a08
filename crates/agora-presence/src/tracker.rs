//! Interest tracking with a one-shot HTTP fallback.
//!
//! While the feed is connected it is the only source of truth. When it
//! is not, tracking a user triggers a single fetch so the UI has
//! something better than `offline` to show.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use agora_common::Presence;
use tracing::{debug, trace};

use crate::api::PresenceApi;
use crate::best_effort::best_effort;
use crate::credential::Session;
use crate::feed::FeedStatus;
use crate::interest::{Interest, InterestRegistry};
use crate::store::PresenceStore;

struct TrackerInner {
    store: PresenceStore,
    interests: InterestRegistry,
    feed: FeedStatus,
    api: Arc<dyn PresenceApi>,
    session: RwLock<Option<Session>>,
    /// Bumped on every session change; fetches started under an older
    /// generation are discarded.
    generation: AtomicU64,
    /// User ids with a pending fetch, and the generation it was issued in.
    in_flight: Mutex<HashMap<String, u64>>,
}

#[derive(Clone)]
pub struct PresenceTracker {
    inner: Arc<TrackerInner>,
}

impl PresenceTracker {
    pub fn new(
        store: PresenceStore,
        interests: InterestRegistry,
        feed: FeedStatus,
        api: Arc<dyn PresenceApi>,
    ) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                store,
                interests,
                feed,
                api,
                session: RwLock::new(None),
                generation: AtomicU64::new(0),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Switch to `session` (or to none). Results of fetches issued for the
    /// previous session are dropped.
    pub fn set_session(&self, session: Option<Session>) {
        let mut current = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *current = session;
    }

    /// Register interest in `user_id`. Drop the returned guard to release it.
    pub fn track(&self, user_id: &str) -> Interest {
        let interest = self.inner.interests.acquire(user_id);
        if self.inner.feed.is_connected() {
            trace!(user_id, "Feed connected, no fetch needed");
        } else {
            self.fetch_once(user_id);
        }
        interest
    }

    /// Current presence of `user_id`, `offline` if unknown.
    pub fn get(&self, user_id: &str) -> Presence {
        self.inner.store.get(user_id)
    }

    /// Number of fetches started and not yet settled.
    pub fn pending_fetches(&self) -> usize {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The current session together with the generation it belongs to.
    fn session_snapshot(&self) -> (Option<Session>, u64) {
        let session = self
            .inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        (
            session.clone(),
            self.inner.generation.load(Ordering::Acquire),
        )
    }

    fn fetch_once(&self, user_id: &str) {
        let (session, generation) = self.session_snapshot();
        let Some(session) = session else {
            trace!(user_id, "No session, skipping fetch");
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(user_id, "No async runtime, skipping fetch");
            return;
        };

        {
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if in_flight.get(user_id) == Some(&generation) {
                trace!(user_id, "Fetch already in flight");
                return;
            }
            in_flight.insert(user_id.to_string(), generation);
        }

        let inner = Arc::clone(&self.inner);
        let user_id = user_id.to_string();
        runtime.spawn(async move {
            let result = inner.api.fetch_presence(&session, &user_id).await;
            if inner.generation.load(Ordering::Acquire) == generation {
                if let Some(presence) = best_effort("fetch_presence", result) {
                    inner.store.upsert(&user_id, presence);
                }
            } else {
                debug!(user_id = %user_id, "Session changed, discarding fetched presence");
            }

            let mut in_flight = inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if in_flight.get(&user_id) == Some(&generation) {
                in_flight.remove(&user_id);
            }
        });
    }
}
