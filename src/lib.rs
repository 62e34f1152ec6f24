// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod extract;
pub mod fs;
pub mod logging;
pub mod rename;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, load_or_default};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, TaskName};
use crate::exec::PipelineExecutor;
use crate::fs::RealFileSystem;
use crate::tasks::Pipeline;
use crate::watch::{WatchBinding, build_bindings_from_config, spawn_watcher, unknown_binding_tasks};

/// High-level entry point used by `main.rs`.
///
/// Loads the config, resolves the requested chain (before anything runs),
/// runs it once and, when the chain contained `watch`, keeps re-running
/// tasks on file changes until Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let (config_path, cfg) = match &args.config {
        Some(path) => (path.clone(), load_and_validate(path)?),
        None => {
            let path = default_config_path();
            let cfg = load_or_default(&path)?;
            (path, cfg)
        }
    };

    let root = config_root_dir(&config_path);
    let pipeline = Pipeline::new(cfg, root, Arc::new(RealFileSystem))?;

    let targets = args.targets();
    let plan = pipeline.plan(&targets)?;

    if args.dry_run {
        let bindings = build_bindings_from_config(pipeline.config())?;
        print_dry_run(&pipeline, &plan, &bindings);
        return Ok(());
    }

    let report = pipeline.invoke(&targets).await?;

    if report.watch_requested {
        watch(Arc::new(pipeline)).await?;
    }
    Ok(())
}

/// Watch mode: re-run bound tasks whenever matching files change.
///
/// Returns on Ctrl-C. A change that triggers a task missing from the graph
/// ends watch mode with `TaskNotFound`.
pub async fn watch(pipeline: Arc<Pipeline>) -> Result<()> {
    let cfg = pipeline.config();
    let bindings = build_bindings_from_config(cfg)?;

    for (glob, task) in unknown_binding_tasks(&bindings, pipeline.graph()) {
        warn!(glob, task, "watch binding names a task that does not exist");
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let executor = PipelineExecutor::new(Arc::clone(&pipeline), rt_tx.clone());

    let _watcher_handle = spawn_watcher(pipeline.root(), bindings, rt_tx.clone(), pipeline.fs())?;

    // Ctrl-C -> graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = CoreRuntime::new(
        cfg.runtime.triggered_while_running_behaviour,
        cfg.runtime.queue_length,
    );

    info!("watching for changes; press Ctrl-C to stop");
    let runtime = Runtime::new(core, rt_rx, executor, pipeline.graph().clone());
    runtime.run().await?;
    Ok(())
}

/// Figure out the project root.
///
/// - If the config path has a non-empty parent (e.g. "docs/Litdag.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Litdag.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print the resolved chain and the watch bindings.
fn print_dry_run(pipeline: &Pipeline, plan: &[TaskName], bindings: &[WatchBinding]) {
    let cfg = pipeline.config();

    println!("litdag dry-run");
    println!("  root = {}", pipeline.root().display());
    println!("  paths.tutorials = {}", cfg.paths.tutorials);
    println!("  paths.examples = {}", cfg.paths.examples);
    println!(
        "  runtime.triggered_while_running_behaviour = {:?}",
        cfg.runtime.triggered_while_running_behaviour
    );
    println!("  runtime.queue_length = {}", cfg.runtime.queue_length);
    println!(
        "  tasks = {}",
        pipeline.graph().tasks().collect::<Vec<_>>().join(", ")
    );
    println!();

    println!("chain ({}):", plan.len());
    for (idx, name) in plan.iter().enumerate() {
        let after = pipeline.graph().dependencies_of(name);
        if after.is_empty() {
            println!("  {}. {name}", idx + 1);
        } else {
            println!("  {}. {name} (after {})", idx + 1, after.join(", "));
        }
    }

    println!();
    println!("watch ({}):", bindings.len());
    for binding in bindings {
        let missing = binding
            .tasks()
            .iter()
            .any(|t| !pipeline.graph().contains(t));
        println!(
            "  - {} -> {}{}",
            binding.glob(),
            binding.tasks().join(", "),
            if missing { "  (unknown task)" } else { "" }
        );
    }

    debug!("dry-run complete (no execution)");
}
