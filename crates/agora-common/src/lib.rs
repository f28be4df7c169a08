pub mod endpoint;
pub mod errors;
pub mod events;
pub mod types;

pub use endpoint::ServerEndpoint;
pub use errors::{AgoraError, ConfigError, PresenceError};
pub use events::{Event, EventBus};
pub use types::{ParsePresenceError, Presence};

pub type Result<T> = std::result::Result<T, AgoraError>;
