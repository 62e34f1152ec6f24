// src/config/mod.rs

//! Configuration loading and validation for litdag.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a config file from disk (or falls back to defaults).
//! - [`validate`] turns a raw file into a validated [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, GenerateSection, IntegrationSection, PathsSection, RawConfigFile,
    RuntimeSection, TaskConfig, WatchBindingConfig,
};
