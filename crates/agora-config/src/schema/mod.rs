//! Configuration schema types for the Agora client.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod onboarding;
mod presence;
mod server;
mod system;

pub use onboarding::*;
pub use presence::*;
pub use server::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration. Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgoraConfig {
    pub server: ServerConfig,
    pub onboarding: OnboardingConfig,
    pub presence: PresenceConfig,
    pub logging: LoggingConfig,
}

impl AgoraConfig {
    /// Whether the presence client should be started for this install.
    ///
    /// Requires a finished onboarding, a configured server and presence
    /// not switched off.
    pub fn presence_ready(&self) -> bool {
        self.onboarding.completed && self.presence.enabled && !self.server.url.trim().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
