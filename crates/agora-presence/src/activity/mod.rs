//! The local user's own presence: heartbeat refresh and idle demotion.

mod emitter;
mod monitor;
mod types;

pub use emitter::{ActivityEmitter, ActivityHandle};
pub use monitor::ActivityMonitor;
pub use types::{ActivityState, InputKind, HEARTBEAT_INTERVAL, IDLE_THRESHOLD};
