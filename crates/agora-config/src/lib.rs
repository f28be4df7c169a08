//! Agora client configuration.
//!
//! A small TOML file holding the preferences needed to bootstrap the
//! client: the server URL, whether onboarding finished, presence and
//! logging options. All sections default, so partial files work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use agora_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! if config.presence_ready() {
//!     println!("{}", config_to_json(&config));
//! }
//! ```

mod config_file;
pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{AgoraConfig, LogLevel, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_from_path};
pub use toml_writer::{save_config, save_config_to_path};

use agora_common::ConfigError;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<AgoraConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &AgoraConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
