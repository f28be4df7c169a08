//! `reqwest` implementation of the presence routes.

use std::time::Duration;

use agora_common::{Presence, PresenceError};
use async_trait::async_trait;
use tracing::debug;

use super::{PresenceApi, BEACON_TIMEOUT};
use crate::best_effort::best_effort;
use crate::credential::Session;
use crate::protocol::{PresenceResponse, SetPresenceRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpPresenceApi {
    client: reqwest::Client,
}

impl HttpPresenceApi {
    pub fn new() -> Result<Self, PresenceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PresenceError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with the rest of the app.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PresenceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PresenceError::Status(status.as_u16()))
    }
}

#[async_trait]
impl PresenceApi for HttpPresenceApi {
    async fn fetch_presence(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<Presence, PresenceError> {
        let response = self
            .client
            .get(session.endpoint.presence_get_url())
            .query(&[
                ("access_token", session.credential.access_token.as_str()),
                ("user_id", user_id),
            ])
            .send()
            .await
            .map_err(|e| PresenceError::Http(e.to_string()))?;

        let body: PresenceResponse = check_status(response)?
            .json()
            .await
            .map_err(|e| PresenceError::Decode(e.to_string()))?;

        debug!(user_id = %user_id, presence = %body.presence, "Fetched presence");
        Ok(body.presence)
    }

    async fn set_presence(
        &self,
        session: &Session,
        presence: Presence,
        status_msg: Option<&str>,
    ) -> Result<(), PresenceError> {
        let body = SetPresenceRequest {
            access_token: &session.credential.access_token,
            user_id: &session.credential.user_id,
            presence,
            status_msg,
        };
        let response = self
            .client
            .post(session.endpoint.presence_set_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| PresenceError::Http(e.to_string()))?;
        check_status(response)?;

        debug!(presence = %presence, "Presence set");
        Ok(())
    }

    async fn beacon(&self, session: &Session, presence: Presence) {
        let body = SetPresenceRequest {
            access_token: &session.credential.access_token,
            user_id: &session.credential.user_id,
            presence,
            status_msg: None,
        };
        let result = self
            .client
            .post(session.endpoint.presence_set_url())
            .timeout(BEACON_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PresenceError::Http(e.to_string()))
            .and_then(check_status);
        if best_effort("beacon", result).is_some() {
            debug!(presence = %presence, "Presence beacon delivered");
        }
    }
}
