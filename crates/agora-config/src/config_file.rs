//! The config file on disk.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use agora_common::ConfigError;
use tracing::debug;

/// `~/.config/agora/config.toml` on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("agora").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("failed to {action} {}: {e}", path.display()))
}

pub(crate) struct ConfigFile<'a> {
    path: &'a Path,
}

impl<'a> ConfigFile<'a> {
    pub(crate) fn at(path: &'a Path) -> Self {
        Self { path }
    }

    /// `None` when the file does not exist.
    pub(crate) fn read(&self) -> Result<Option<String>, ConfigError> {
        match fs::read_to_string(self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", self.path, e)),
        }
    }

    /// Write `contents` only if nothing is there yet. Returns whether the
    /// file was created.
    pub(crate) fn create(&self, contents: &str) -> Result<bool, ConfigError> {
        self.ensure_parent()?;
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(io_error("create", self.path, e)),
        };
        file.write_all(contents.as_bytes())
            .map_err(|e| io_error("write", self.path, e))?;
        Ok(true)
    }

    /// Replace the file through a `.tmp` sibling so readers never see a
    /// half-written config.
    pub(crate) fn replace(&self, contents: &str) -> Result<(), ConfigError> {
        self.ensure_parent()?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents).map_err(|e| io_error("write", &tmp, e))?;
        if let Err(e) = fs::rename(&tmp, self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error("replace", self.path, e));
        }
        debug!(path = %self.path.display(), "Config written");
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), ConfigError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(ConfigFile::at(&path).read().unwrap(), None);
    }

    #[test]
    fn create_never_clobbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agora").join("config.toml");
        let file = ConfigFile::at(&path);

        assert!(file.create("first").unwrap());
        assert!(!file.create("second").unwrap());
        assert_eq!(file.read().unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn replace_overwrites_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let file = ConfigFile::at(&path);

        file.replace("a = 1").unwrap();
        file.replace("a = 2").unwrap();

        assert_eq!(file.read().unwrap().as_deref(), Some("a = 2"));
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        assert!(ConfigFile::at(dir.path()).read().is_err());
    }

    #[test]
    fn default_path_ends_with_agora() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("agora/config.toml"));
        }
    }
}
