// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::{TaskGraph, names};
use crate::errors::{LitdagError, Result};
use crate::fs::glob::{compile_glob, normalize_pattern};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LitdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let cfg = ConfigFile::new_unchecked(raw);
        validate_watch_bindings(&cfg)?;
        // Builds the full graph once purely to surface unknown deps / cycles.
        TaskGraph::from_config(&cfg)?;
        Ok(cfg)
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_generate(cfg)?;
    validate_output_coverage(cfg)?;
    validate_runtime(cfg)?;
    validate_custom_tasks(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    for (key, pattern) in [
        ("paths.tutorials", &paths.tutorials),
        ("paths.examples", &paths.examples),
        ("paths.deps", &paths.deps),
    ] {
        compile_glob(pattern).map_err(|e| {
            LitdagError::ConfigError(format!("[{key}] is not a valid glob: {e:#}"))
        })?;
    }

    if paths.examples_dir.trim().is_empty() {
        return Err(LitdagError::ConfigError(
            "[paths].examples_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_generate(cfg: &RawConfigFile) -> Result<()> {
    let ext = &cfg.generate.extension;
    if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(LitdagError::ConfigError(format!(
            "[generate].extension must be a bare extension like \"py\" (got {ext:?})"
        )));
    }
    Ok(())
}

/// Generated examples land in `examples_dir` with the configured extension;
/// `paths.examples` must match them or Clean and Integration never see them.
fn validate_output_coverage(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    let dir = normalize_pattern(&paths.examples_dir).trim_end_matches('/');
    let sample = if dir.is_empty() || dir == "." {
        format!("example.{}", cfg.generate.extension)
    } else {
        format!("{dir}/example.{}", cfg.generate.extension)
    };

    let matcher = compile_glob(&paths.examples)
        .map_err(|e| LitdagError::ConfigError(format!("[paths.examples] is not a valid glob: {e:#}")))?;
    if !matcher.is_match(&sample) {
        return Err(LitdagError::ConfigError(format!(
            "[paths].examples ({}) does not match generated examples such as {sample}; \
             set it to cover [paths].examples_dir and [generate].extension",
            paths.examples
        )));
    }
    Ok(())
}

fn validate_runtime(cfg: &RawConfigFile) -> Result<()> {
    // triggered_while_running_behaviour is strongly typed and checked during
    // deserialization.
    if cfg.runtime.queue_length == 0 {
        return Err(LitdagError::ConfigError(
            "[runtime].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_custom_tasks(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if names::ALL.contains(&name.as_str()) {
            return Err(LitdagError::ConfigError(format!(
                "[task.{name}] shadows a built-in task"
            )));
        }
        if task.cmd.trim().is_empty() {
            return Err(LitdagError::ConfigError(format!(
                "[task.{name}].cmd must not be empty"
            )));
        }
    }
    Ok(())
}

/// Watch bindings must be well-formed, but the tasks they name are only
/// checked when a matching event fires.
fn validate_watch_bindings(cfg: &ConfigFile) -> Result<()> {
    for (idx, binding) in cfg.watch_bindings().iter().enumerate() {
        compile_glob(&binding.glob).map_err(|e| {
            LitdagError::ConfigError(format!(
                "[[watch]] entry {idx} has an invalid glob: {e:#}"
            ))
        })?;
        if binding.tasks.is_empty() {
            return Err(LitdagError::ConfigError(format!(
                "[[watch]] entry {idx} ({}) lists no tasks",
                binding.glob
            )));
        }
    }
    Ok(())
}
