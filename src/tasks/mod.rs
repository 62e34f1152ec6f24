// src/tasks/mod.rs

//! Task bodies and the pipeline that runs them in dependency order.
//!
//! - [`clean`] removes stale generated examples.
//! - [`generate`] extracts examples from the tutorials.
//! - [`integration`] runs the optional test command over the examples.
//!
//! [`Pipeline`] owns the config, the task graph and the filesystem handle and
//! executes one resolved chain at a time.

pub mod clean;
pub mod generate;
pub mod integration;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::model::ConfigFile;
use crate::dag::{TaskAction, TaskDef, TaskGraph, resolve};
use crate::engine::TaskName;
use crate::errors::{LitdagError, Result};
use crate::exec::run_shell;
use crate::extract::ExtractOptions;
use crate::fs::FileSystem;

pub use clean::{CleanReport, clean};
pub use generate::{FileOutcome, FileResult, GenerateOptions, GenerateReport, generate_examples};
pub use integration::run_integration;

/// What one invocation did.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Tasks whose bodies ran, in order.
    pub executed: Vec<TaskName>,
    pub clean: Option<CleanReport>,
    pub generate: Option<GenerateReport>,
    /// The chain included the `watch` task.
    pub watch_requested: bool,
}

#[derive(Debug)]
pub struct Pipeline {
    cfg: ConfigFile,
    graph: TaskGraph,
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl Pipeline {
    pub fn new(cfg: ConfigFile, root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let graph = TaskGraph::from_config(&cfg)?;
        Ok(Self {
            cfg,
            graph,
            fs,
            root: root.into(),
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.cfg
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// Resolve targets into the chain [`Pipeline::invoke`] would run.
    pub fn plan<S: AsRef<str>>(&self, targets: &[S]) -> Result<Vec<TaskName>> {
        resolve(&self.graph, targets)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        let generate = &self.cfg.generate;
        GenerateOptions {
            tutorials: self.cfg.paths.tutorials.clone(),
            examples_dir: PathBuf::from(&self.cfg.paths.examples_dir),
            extension: generate.extension.clone(),
            extract: ExtractOptions {
                languages: generate.languages.clone(),
                indented_blocks: generate.indented_blocks,
            },
        }
    }

    /// Run `targets` and all their prerequisites, each exactly once, strictly
    /// one after another. The plan is resolved before any body runs, and the
    /// first failing task aborts the rest of the chain.
    pub async fn invoke<S: AsRef<str>>(&self, targets: &[S]) -> Result<RunReport> {
        let plan = self.plan(targets)?;
        info!(?plan, "running task chain");

        let mut report = RunReport::default();
        for name in &plan {
            let def = self
                .graph
                .get(name)
                .ok_or_else(|| LitdagError::TaskNotFound(name.clone()))?;
            self.run_task(def, &mut report).await?;
            report.executed.push(name.clone());
        }

        info!(tasks = report.executed.len(), "task chain finished");
        Ok(report)
    }

    async fn run_task(&self, def: &TaskDef, report: &mut RunReport) -> Result<()> {
        debug!(task = %def.name, action = ?def.action, "starting task");
        let fs = self.fs.as_ref();

        match &def.action {
            TaskAction::Clean => {
                report.clean = Some(clean(fs, &self.root, &self.cfg.paths.examples)?);
            }
            TaskAction::GenerateExamples => {
                let generated = generate_examples(fs, &self.root, &self.generate_options())?;
                report.generate = Some(generated.apply_policy(self.cfg.generate.on_error)?);
            }
            TaskAction::Integration => {
                run_integration(
                    fs,
                    &self.root,
                    &self.cfg.paths.examples,
                    self.cfg.integration.cmd.as_deref(),
                )
                .await?;
            }
            TaskAction::Alias => {}
            TaskAction::Watch => {
                report.watch_requested = true;
            }
            TaskAction::Shell(cmd) => {
                let code = run_shell(&def.name, cmd, &[], &self.root).await?;
                if code != 0 {
                    return Err(LitdagError::TaskFailed {
                        task: def.name.clone(),
                        reason: format!("`{cmd}` exited with code {code}"),
                    });
                }
            }
        }

        debug!(task = %def.name, "task finished");
        Ok(())
    }
}
