// src/engine/queue.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use super::TaskName;
use crate::types::TriggerWhileRunningBehaviour;

/// Triggers that arrive while a chain is already running.
///
/// Semantics:
/// - Each queued entry is a *batch* of task names that becomes one future
///   chain run.
/// - `queue_length` (`max_runs`) bounds the number of batches. Once the bound
///   is reached, new triggers are merged into the last batch. With the
///   default of 1, everything that happens during a run is coalesced into a
///   single follow-up run.
/// - In `Drop` mode nothing is ever queued.
#[derive(Debug)]
pub struct TriggerQueue {
    behaviour: TriggerWhileRunningBehaviour,
    max_runs: usize,
    runs: VecDeque<BTreeSet<TaskName>>,
}

impl TriggerQueue {
    /// `max_runs` is clamped to at least 1.
    pub fn new(behaviour: TriggerWhileRunningBehaviour, max_runs: usize) -> Self {
        Self {
            behaviour,
            max_runs: max_runs.max(1),
            runs: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of queued batches.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn behaviour(&self) -> TriggerWhileRunningBehaviour {
        self.behaviour
    }

    /// Record one trigger event (possibly naming several tasks) that arrived
    /// while a chain was running.
    pub fn record_triggers(&mut self, tasks: &[TaskName]) {
        if tasks.is_empty() {
            return;
        }

        match self.behaviour {
            TriggerWhileRunningBehaviour::Queue => {
                if self.runs.len() < self.max_runs {
                    self.runs.push_back(tasks.iter().cloned().collect());
                    debug!(?tasks, queued = self.runs.len(), "queued trigger batch");
                } else if let Some(last) = self.runs.back_mut() {
                    last.extend(tasks.iter().cloned());
                    debug!(
                        ?tasks,
                        max_runs = self.max_runs,
                        "queue full; coalesced trigger into last batch"
                    );
                }
            }
            TriggerWhileRunningBehaviour::Drop => {
                warn!(?tasks, "chain already running; dropping trigger (drop mode)");
            }
        }
    }

    /// Pop the next batch to run, sorted by name.
    pub fn next_batch(&mut self) -> Option<Vec<TaskName>> {
        let batch = self.runs.pop_front()?;
        debug!(remaining = self.runs.len(), "dequeued trigger batch");
        Some(batch.into_iter().collect())
    }
}
