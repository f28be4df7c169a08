//! Wire types shared with the Agora API.
//!
//! The live feed pushes [`PresenceDelta`] text frames; the HTTP routes take
//! [`SetPresenceRequest`] and answer [`PresenceResponse`].

use agora_common::Presence;
use serde::{Deserialize, Serialize};

/// One presence change pushed by the live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDelta {
    pub user_id: String,
    pub presence: Presence,
}

impl PresenceDelta {
    /// Parse a feed frame. `None` for anything that is not a well-formed
    /// delta, including unknown presence values and empty user ids.
    pub fn parse(text: &str) -> Option<Self> {
        let delta: Self = serde_json::from_str(text).ok()?;
        if delta.user_id.is_empty() {
            return None;
        }
        Some(delta)
    }
}

/// Body of `POST /presence/set`.
#[derive(Debug, Serialize)]
pub struct SetPresenceRequest<'a> {
    pub access_token: &'a str,
    pub user_id: &'a str,
    pub presence: Presence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_msg: Option<&'a str>,
}

/// Body of the `GET /presence/get` answer.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceResponse {
    pub presence: Presence,
    #[serde(default)]
    pub last_active_ago: Option<i64>,
    #[serde(default)]
    pub status_msg: Option<String>,
    #[serde(default)]
    pub currently_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_delta() {
        let delta = PresenceDelta::parse(r#"{"user_id":"@bob:home","presence":"unavailable"}"#)
            .unwrap();
        assert_eq!(delta.user_id, "@bob:home");
        assert_eq!(delta.presence, Presence::Unavailable);
    }

    #[test]
    fn ignores_extra_fields() {
        let delta =
            PresenceDelta::parse(r#"{"user_id":"@bob:home","presence":"online","ts":12}"#).unwrap();
        assert_eq!(delta.presence, Presence::Online);
    }

    #[test]
    fn drops_malformed_frames() {
        for text in [
            "",
            "not json",
            "[]",
            r#"{"user_id":"@bob:home"}"#,
            r#"{"presence":"online"}"#,
            r#"{"user_id":"@bob:home","presence":"busy"}"#,
            r#"{"user_id":"","presence":"online"}"#,
            r#"{"user_id":42,"presence":"online"}"#,
        ] {
            assert!(PresenceDelta::parse(text).is_none(), "{text:?} should be dropped");
        }
    }

    #[test]
    fn set_request_omits_missing_status() {
        let req = SetPresenceRequest {
            access_token: "tok",
            user_id: "@alice:home",
            presence: Presence::Online,
            status_msg: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "access_token": "tok",
                "user_id": "@alice:home",
                "presence": "online"
            })
        );
    }

    #[test]
    fn response_needs_only_presence() {
        let resp: PresenceResponse = serde_json::from_str(r#"{"presence":"offline"}"#).unwrap();
        assert_eq!(resp.presence, Presence::Offline);
        assert!(resp.currently_active.is_none());

        let full: PresenceResponse = serde_json::from_str(
            r#"{"presence":"online","last_active_ago":null,"status_msg":null,"currently_active":true}"#,
        )
        .unwrap();
        assert_eq!(full.currently_active, Some(true));
    }
}
