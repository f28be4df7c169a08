use agora_common::ServerEndpoint;

/// Identity of the logged-in user plus the token that authorizes it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }
}

/// Everything needed to talk to the server for one logged-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub endpoint: ServerEndpoint,
}

impl Session {
    pub fn new(credential: Credential, endpoint: ServerEndpoint) -> Self {
        Self {
            credential,
            endpoint,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.credential.user_id
    }
}
