//! Live presence feed over a WebSocket.
//!
//! [`FeedManager`] owns at most one background connection per session.
//! The connection reconnects with exponential backoff until the manager
//! is stopped, and writes every delta it receives into the shared store.

mod backoff;
mod connection;
mod handler;
mod manager;
mod session;
mod types;

pub use backoff::{Backoff, RECONNECT_CEILING, RECONNECT_FLOOR};
pub use manager::FeedManager;
pub use types::{FeedStatus, CONNECT_TIMEOUT};
