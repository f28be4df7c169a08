//! Presence client for the agora chat server.
//!
//! Shows who is online for the users the UI currently cares about and
//! reports the local user's own state:
//!
//! - [`PresenceStore`]: last known presence per user, observable through
//!   the shared [`EventBus`](agora_common::EventBus).
//! - [`PresenceTracker`]: reference-counted interest with a one-shot HTTP
//!   fetch while the feed is down.
//! - [`FeedManager`]: the live WebSocket feed with backoff reconnects.
//! - [`ActivityEmitter`]: heartbeat and idle detection for the local user.
//! - [`PresenceContext`]: wires all of the above to a login session.

pub mod activity;
pub mod api;
pub mod best_effort;
pub mod context;
pub mod credential;
pub mod feed;
pub mod interest;
pub mod protocol;
pub mod store;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use agora_common::ServerEndpoint;

pub use activity::{ActivityEmitter, ActivityHandle, ActivityState, InputKind};
pub use api::{HttpPresenceApi, PresenceApi};
pub use context::PresenceContext;
pub use credential::{Credential, Session};
pub use feed::{FeedManager, FeedStatus};
pub use interest::{Interest, InterestRegistry};
pub use store::PresenceStore;
pub use tracker::PresenceTracker;
