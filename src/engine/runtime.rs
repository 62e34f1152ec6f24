// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::TaskGraph;
use crate::errors::{LitdagError, Result};
use crate::exec::ExecutorBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Async IO shell around [`CoreRuntime`].
///
/// Reads events from the channel, checks trigger targets against the task
/// graph, feeds the core and hands chains to the [`ExecutorBackend`].
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    graph: TaskGraph,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
        graph: TaskGraph,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            graph,
        }
    }

    /// Main event loop.
    ///
    /// Returns `Ok(())` on shutdown or when the channel closes. A trigger
    /// naming a task missing from the graph ends the loop with
    /// [`LitdagError::TaskNotFound`].
    pub async fn run(mut self) -> Result<()> {
        info!("litdag runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if let RuntimeEvent::TasksTriggered { tasks, .. } = &event {
                self.check_known(tasks)?;
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    fn check_known(&self, tasks: &[String]) -> Result<()> {
        match tasks.iter().find(|t| !self.graph.contains(t)) {
            Some(missing) => {
                error!(task = %missing, "watch binding triggered a task that does not exist");
                Err(LitdagError::TaskNotFound(missing.clone()))
            }
            None => Ok(()),
        }
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        let CoreCommand::StartChain { run_id, tasks } = command;
        debug!(run_id, ?tasks, "dispatching chain");
        self.executor.start_chain(run_id, tasks).await
    }
}
