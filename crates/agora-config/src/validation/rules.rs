//! Individual validation rules.

use agora_common::ServerEndpoint;

use crate::schema::AgoraConfig;

/// Longest status message the server will store.
const MAX_STATUS_MESSAGE_LEN: usize = 256;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &AgoraConfig) {
    let url = config.server.url.trim();
    if url.is_empty() {
        return;
    }
    if let Err(e) = ServerEndpoint::parse(url) {
        errors.push(format!("server.url is not usable: {e}"));
    }
}

pub(crate) fn validate_onboarding(errors: &mut Vec<String>, config: &AgoraConfig) {
    if config.onboarding.completed && config.server.url.trim().is_empty() {
        errors.push("onboarding.completed requires server.url to be set".into());
    }
}

pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &AgoraConfig) {
    let len = config.presence.status_message.chars().count();
    if len > MAX_STATUS_MESSAGE_LEN {
        errors.push(format!(
            "presence.status_message is {len} characters, max {MAX_STATUS_MESSAGE_LEN}"
        ));
    }
}
