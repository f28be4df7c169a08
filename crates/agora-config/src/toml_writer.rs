//! Persist an [`AgoraConfig`] as TOML.

use std::path::Path;

use agora_common::ConfigError;

use crate::config_file::{default_config_path, ConfigFile};
use crate::schema::AgoraConfig;

/// Write config to the platform default path.
pub fn save_config(config: &AgoraConfig) -> Result<(), ConfigError> {
    save_config_to_path(config, &default_config_path()?)
}

/// Write config to `path`, replacing whatever is there. The commented
/// template is not preserved.
pub fn save_config_to_path(config: &AgoraConfig, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config to TOML: {e}")))?;
    ConfigFile::at(path).replace(&text)
}
