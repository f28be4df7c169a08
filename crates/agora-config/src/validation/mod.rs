//! Configuration validation.
//!
//! Each rule pushes a message into a shared list; the orchestrator
//! folds them into a single `ConfigError`.

mod rules;

#[cfg(test)]
mod tests;

use crate::schema::AgoraConfig;
use agora_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AgoraConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    rules::validate_server(&mut errors, config);
    rules::validate_onboarding(&mut errors, config);
    rules::validate_presence(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
