//! Request/response side of the presence contract.
//!
//! The trait is the seam the tracker and the activity emitter talk
//! through; [`HttpPresenceApi`] is the production implementation.

mod http;

pub use http::HttpPresenceApi;

use std::time::Duration;

use agora_common::{Presence, PresenceError};
use async_trait::async_trait;

use crate::credential::Session;

/// Upper bound on the app-close `offline` send.
pub const BEACON_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait]
pub trait PresenceApi: Send + Sync {
    /// One-shot lookup of another user's presence.
    async fn fetch_presence(&self, session: &Session, user_id: &str)
        -> Result<Presence, PresenceError>;

    /// Set the session user's own presence.
    async fn set_presence(
        &self,
        session: &Session,
        presence: Presence,
        status_msg: Option<&str>,
    ) -> Result<(), PresenceError>;

    /// Short, failure-swallowing variant of
    /// [`set_presence`](Self::set_presence) for teardown paths. Finishes
    /// within [`BEACON_TIMEOUT`]; delivery is not reported.
    async fn beacon(&self, session: &Session, presence: Presence);
}
