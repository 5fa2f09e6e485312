//! User configuration
//!
//! Persists the library root in `~/.shelf/config.toml`. The workspace root is
//! always supplied per invocation, so only the shared library location lives
//! here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::paths;

/// Configuration problems surfaced to the user before any state changes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no library path configured; run `shelf set-library <path>` first")]
    LibraryRootUnset,
    #[error("library path {0:?} does not exist")]
    LibraryRootMissing(PathBuf),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library_path: Option<PathBuf>,
}

impl Config {
    /// Load from `~/.shelf/config.toml`; a missing file is the default config
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&paths::config_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    /// Resolve the configured library root, validating that it exists
    pub fn library_root(&self) -> Result<&Path, ConfigError> {
        let path = self
            .library_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::LibraryRootUnset)?;
        if !path.exists() {
            return Err(ConfigError::LibraryRootMissing(path.to_path_buf()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("config.toml");
        let config = Config {
            library_path: Some(PathBuf::from("/srv/library")),
        };
        config.save_to(&file).unwrap();

        let loaded = Config::load_from(&file).unwrap();
        assert_eq!(loaded.library_path, config.library_path);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let loaded = Config::load_from(&temp.path().join("none.toml")).unwrap();
        assert!(loaded.library_path.is_none());
    }

    #[test]
    fn test_unset_library_root_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            config.library_root(),
            Err(ConfigError::LibraryRootUnset)
        ));
    }

    #[test]
    fn test_dangling_library_root_is_config_error() {
        let temp = tempdir().unwrap();
        let config = Config {
            library_path: Some(temp.path().join("gone")),
        };
        assert!(matches!(
            config.library_root(),
            Err(ConfigError::LibraryRootMissing(_))
        ));
    }
}
