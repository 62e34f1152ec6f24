// src/exec/backend.rs

//! Pluggable chain executor.
//!
//! The watch runtime asks an [`ExecutorBackend`] to run a chain of targets
//! and expects a [`RuntimeEvent::ChainCompleted`] for that run once the
//! chain is over. Tests provide backends that record the request and report
//! completion immediately.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::{ChainOutcome, RuntimeEvent, TaskName};
use crate::errors::Result;
use crate::tasks::Pipeline;

/// Trait abstracting how triggered chains are executed.
pub trait ExecutorBackend: Send {
    /// Start running `targets` (and their prerequisites) as run `run_id`.
    ///
    /// Implementations must eventually emit `ChainCompleted { run_id, .. }`
    /// on the runtime channel; the returned future only covers dispatch.
    fn start_chain(
        &mut self,
        run_id: u64,
        targets: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: runs each chain on a shared [`Pipeline`] in a
/// background Tokio task.
pub struct PipelineExecutor {
    pipeline: Arc<Pipeline>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl PipelineExecutor {
    pub fn new(pipeline: Arc<Pipeline>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            pipeline,
            runtime_tx,
        }
    }
}

impl ExecutorBackend for PipelineExecutor {
    fn start_chain(
        &mut self,
        run_id: u64,
        targets: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let outcome = match pipeline.invoke(&targets).await {
                    Ok(report) => {
                        info!(run_id, executed = ?report.executed, "re-run finished");
                        ChainOutcome::Success
                    }
                    Err(err) => {
                        error!(run_id, error = %err, "re-run failed");
                        ChainOutcome::Failed(err.to_string())
                    }
                };

                if tx
                    .send(RuntimeEvent::ChainCompleted { run_id, outcome })
                    .await
                    .is_err()
                {
                    info!(run_id, "runtime gone before chain completion was reported");
                }
            });
            Ok(())
        })
    }
}
