use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use litdag::engine::{ChainOutcome, RuntimeEvent, TaskName};
use litdag::errors::Result;
use litdag::exec::ExecutorBackend;
use tokio::sync::mpsc;

/// A fake executor that:
/// - records every chain it is asked to run
/// - reports `ChainCompleted` with a fixed outcome straight away
/// - optionally requests shutdown once it has run a given number of chains.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    chains: Arc<Mutex<Vec<Vec<TaskName>>>>,
    outcome: ChainOutcome,
    stop_after: Option<usize>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        chains: Arc<Mutex<Vec<Vec<TaskName>>>>,
    ) -> Self {
        Self {
            runtime_tx,
            chains,
            outcome: ChainOutcome::Success,
            stop_after: None,
        }
    }

    /// Send `ShutdownRequested` right after the `n`th chain completes.
    pub fn stop_after(mut self, n: usize) -> Self {
        self.stop_after = Some(n);
        self
    }

    /// Report every chain as failed with `reason`.
    pub fn failing(mut self, reason: &str) -> Self {
        self.outcome = ChainOutcome::Failed(reason.to_string());
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn start_chain(
        &mut self,
        run_id: u64,
        targets: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let chains = Arc::clone(&self.chains);
        let outcome = self.outcome.clone();
        let stop_after = self.stop_after;

        Box::pin(async move {
            let count = {
                let mut chains = chains.lock().unwrap();
                chains.push(targets);
                chains.len()
            };

            tx.send(RuntimeEvent::ChainCompleted { run_id, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            if stop_after == Some(count) {
                tx.send(RuntimeEvent::ShutdownRequested)
                    .await
                    .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
