//! Server endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where the Agora API lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base `http://` or `https://` URL of the API. Empty until onboarding
    /// has picked a server.
    pub url: String,
}
