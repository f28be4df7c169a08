//! Presence is optional: failures on the fire-and-forget paths are logged
//! and dropped here instead of reaching the caller.

use agora_common::PresenceError;
use tracing::debug;

/// Swallow a presence failure. The returned `Option` carries the value on
/// success and may be ignored freely.
pub fn best_effort<T>(what: &str, result: Result<T, PresenceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(operation = what, error = %e, "presence call failed, ignoring");
            None
        }
    }
}
