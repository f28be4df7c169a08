//! Parse the config file, creating the commented template on first run.

use std::path::Path;

use agora_common::ConfigError;
use tracing::{info, warn};

use super::template::default_config_toml;
use crate::config_file::{default_config_path, ConfigFile};
use crate::schema::AgoraConfig;
use crate::validation;

fn parse(text: &str) -> Result<AgoraConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A config that fails
/// validation is still returned, with a warning logged.
pub fn load_from_path(path: &Path) -> Result<AgoraConfig, ConfigError> {
    let text = ConfigFile::at(path)
        .read()?
        .ok_or_else(|| ConfigError::FileNotFound(path.to_path_buf()))?;
    let config = parse(&text)?;
    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Write the commented template to `path` unless a file already exists.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if ConfigFile::at(path).create(&default_config_toml())? {
        info!("created default config at {}", path.display());
    }
    Ok(())
}

/// Load from `path`, writing and returning the defaults when it is absent.
pub(crate) fn load_or_create(path: &Path) -> Result<AgoraConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(path)?;
            Ok(AgoraConfig::default())
        }
        other => other,
    }
}

/// Load config from the platform default path.
pub fn load_default() -> Result<AgoraConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}
