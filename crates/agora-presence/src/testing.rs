//! In-memory `PresenceApi` used by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agora_common::{Presence, PresenceError, ServerEndpoint};
use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use crate::api::PresenceApi;
use crate::credential::{Credential, Session};

pub(crate) fn session(user_id: &str) -> Session {
    Session::new(
        Credential::new(user_id, "test-token"),
        // Nothing listens on the discard port, so feeds never connect.
        ServerEndpoint::parse("http://127.0.0.1:9").unwrap(),
    )
}

#[derive(Debug, Clone)]
struct SetCall {
    at: Duration,
    presence: Presence,
    status_message: Option<String>,
}

pub(crate) struct RecordingApi {
    created: Instant,
    fail: bool,
    gate: Option<Semaphore>,
    remote: Mutex<HashMap<String, Presence>>,
    sets: Mutex<Vec<SetCall>>,
    fetches: Mutex<Vec<String>>,
    beacons: Mutex<Vec<Presence>>,
}

impl RecordingApi {
    fn build(fail: bool, gate: Option<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            created: Instant::now(),
            fail,
            gate,
            remote: Mutex::new(HashMap::new()),
            sets: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
            beacons: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn new() -> Arc<Self> {
        Self::build(false, None)
    }

    /// Every call is recorded and then fails.
    pub(crate) fn failing() -> Arc<Self> {
        Self::build(true, None)
    }

    /// Fetches block until [`release_fetches`](Self::release_fetches).
    pub(crate) fn gated() -> Arc<Self> {
        Self::build(false, Some(Semaphore::new(0)))
    }

    pub(crate) fn release_fetches(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn set_remote(&self, user_id: &str, presence: Presence) {
        self.remote
            .lock()
            .unwrap()
            .insert(user_id.to_string(), presence);
    }

    pub(crate) fn set_calls(&self) -> Vec<(Duration, Presence)> {
        self.sets
            .lock()
            .unwrap()
            .iter()
            .map(|c| (c.at, c.presence))
            .collect()
    }

    pub(crate) fn status_messages(&self) -> Vec<Option<String>> {
        self.sets
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.status_message.clone())
            .collect()
    }

    pub(crate) fn fetch_calls(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub(crate) fn beacons(&self) -> Vec<Presence> {
        self.beacons.lock().unwrap().clone()
    }
}

#[async_trait]
impl PresenceApi for RecordingApi {
    async fn fetch_presence(
        &self,
        _session: &Session,
        user_id: &str,
    ) -> Result<Presence, PresenceError> {
        self.fetches.lock().unwrap().push(user_id.to_string());
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.fail {
            return Err(PresenceError::Status(500));
        }
        Ok(self
            .remote
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or_default())
    }

    async fn set_presence(
        &self,
        _session: &Session,
        presence: Presence,
        status_msg: Option<&str>,
    ) -> Result<(), PresenceError> {
        self.sets.lock().unwrap().push(SetCall {
            at: self.created.elapsed(),
            presence,
            status_message: status_msg.map(str::to_string),
        });
        if self.fail {
            return Err(PresenceError::Http("connection refused".into()));
        }
        Ok(())
    }

    async fn beacon(&self, _session: &Session, presence: Presence) {
        // Recorded only once the caller has actually awaited the send.
        tokio::task::yield_now().await;
        self.beacons.lock().unwrap().push(presence);
    }
}
