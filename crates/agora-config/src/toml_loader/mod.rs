//! TOML config file loading and creation.

mod loader;
mod template;

#[cfg(test)]
mod tests;

pub use crate::config_file::default_config_path;
pub use loader::{create_default_config, load_default, load_from_path};
