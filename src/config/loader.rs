// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to also
/// check task references, cycles and glob syntax.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise validate the built-in defaults.
///
/// Used for the implicit default path only: an explicitly requested config
/// file that does not exist is an error, reported by [`load_and_validate`].
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if path.is_file() {
        return load_and_validate(path);
    }

    debug!(path = ?path, "no config file found; using built-in defaults");
    ConfigFile::try_from(RawConfigFile::default())
}

/// The config file looked up when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Litdag.toml")
}
