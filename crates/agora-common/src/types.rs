//! Shared value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse availability of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Unavailable,
    #[default]
    Offline,
}

impl Presence {
    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Online => "online",
            Presence::Unavailable => "unavailable",
            Presence::Offline => "offline",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown presence value: {0}")]
pub struct ParsePresenceError(pub String);

impl FromStr for Presence {
    type Err = ParsePresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Presence::Online),
            "unavailable" => Ok(Presence::Unavailable),
            "offline" => Ok(Presence::Offline),
            other => Err(ParsePresenceError(other.to_string())),
        }
    }
}
