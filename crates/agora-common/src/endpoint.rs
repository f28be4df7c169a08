//! Server URL handling: one validated base URL, every route derived from it.

use std::fmt;

use url::Url;

use crate::errors::PresenceError;

const PRESENCE_GET_PATH: &str = "presence/get";
const PRESENCE_SET_PATH: &str = "presence/set";
const FEED_PATH: &str = "ws/presence";

/// Base `http(s)://` URL of the Agora API with its derived routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    base: Url,
    get: Url,
    set: Url,
    feed: Url,
}

impl ServerEndpoint {
    /// Accepts an absolute `http` or `https` URL with a host and no query,
    /// fragment or credentials. A path prefix is kept.
    pub fn parse(url: &str) -> Result<Self, PresenceError> {
        let invalid = |reason: &str| PresenceError::InvalidEndpoint(format!("{url}: {reason}"));

        let mut base = Url::parse(url.trim()).map_err(|e| invalid(&e.to_string()))?;
        let secure = match base.scheme() {
            "https" => true,
            "http" => false,
            _ => return Err(invalid("scheme must be http or https")),
        };
        if base.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        if !base.username().is_empty() || base.password().is_some() {
            return Err(invalid("credentials are not allowed"));
        }

        // Routes are joined onto the path, so it must end in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| base.join(path).map_err(|e| invalid(&e.to_string()));
        let get = join(PRESENCE_GET_PATH)?;
        let set = join(PRESENCE_SET_PATH)?;
        let mut feed = join(FEED_PATH)?;
        feed.set_scheme(if secure { "wss" } else { "ws" })
            .map_err(|()| invalid("cannot derive websocket url"))?;

        Ok(Self {
            base,
            get,
            set,
            feed,
        })
    }

    /// Base URL without the trailing slash, as stored in config.
    pub fn base(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn presence_get_url(&self) -> Url {
        self.get.clone()
    }

    pub fn presence_set_url(&self) -> Url {
        self.set.clone()
    }

    /// WebSocket URL of the live feed, token carried in the query string.
    pub fn feed_url(&self, access_token: &str) -> String {
        let mut url = self.feed.clone();
        url.query_pairs_mut().append_pair("access_token", access_token);
        url.into()
    }

    /// Feed URL safe to log.
    pub fn feed_url_without_query(&self) -> &str {
        self.feed.as_str()
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())
    }
}
