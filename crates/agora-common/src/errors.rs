use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the presence client. None of these reach the UI on the
/// best-effort paths; they are logged and dropped there.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("http error: {0}")]
    Http(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid server endpoint: {0}")]
    InvalidEndpoint(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AgoraError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Presence(#[from] PresenceError),

    #[error("{0}")]
    Other(String),
}
